//! Element values and props.
//!
//! An [`Element`] describes *what* to render. It is a closed union: nothing,
//! a primitive rendered as text, an already materialized node, or a
//! fragment of further elements. The materializer in
//! [`render::materialize`](crate::render::materialize) turns any element
//! into exactly one concrete node.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::css::{Classes, IntoClasses, IntoStyles, Styles};
use crate::dom::{Event, EventHandler, NodeId};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Element {
    /// Renders nothing (an empty container).
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// An already materialized node, passed through unchanged.
    Node(NodeId),
    /// An ordered sequence of elements without a wrapping identity.
    Fragment(Vec<Element>),
}

impl Element {
    /// Build a fragment from anything convertible into elements.
    pub fn fragment<I, T>(children: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Element>,
    {
        Element::Fragment(children.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Element::Empty)
    }

    /// The canonical text form of a primitive element.
    pub fn primitive_text(&self) -> Option<String> {
        match self {
            Element::Text(text) => Some(text.clone()),
            Element::Number(n) => Some(format_number(*n)),
            Element::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Format a number the way it reads in markup: integers without a decimal
/// point, `NaN`, `Infinity`, `-Infinity`, and exponent form (`1e+21`,
/// `1.5e-7`) for magnitudes of at least 1e21 or below 1e-6.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    } else {
        n.to_string()
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Text(value.to_string())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Text(value)
    }
}

impl From<&String> for Element {
    fn from(value: &String) -> Self {
        Element::Text(value.clone())
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::Bool(value)
    }
}

macro_rules! impl_numeric_element {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Element::Number(value as f64)
                }
            }
        )*
    };
}

impl_numeric_element!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<NodeId> for Element {
    fn from(value: NodeId) -> Self {
        Element::Node(value)
    }
}

impl From<()> for Element {
    fn from(_: ()) -> Self {
        Element::Empty
    }
}

impl<T: Into<Element>> From<Option<T>> for Element {
    fn from(value: Option<T>) -> Self {
        value.map_or(Element::Empty, Into::into)
    }
}

impl<T: Into<Element>> From<Vec<T>> for Element {
    fn from(value: Vec<T>) -> Self {
        Element::fragment(value)
    }
}

impl<T: Into<Element>, const N: usize> From<[T; N]> for Element {
    fn from(value: [T; N]) -> Self {
        Element::fragment(value)
    }
}

/// A single property value.
#[derive(Clone)]
pub enum PropValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Classes(Classes),
    Styles(Styles),
    Handler(EventHandler),
    Element(Element),
    /// Opaque data for components; never written to intrinsic elements.
    Any(Rc<dyn Any>),
}

impl PropValue {
    pub fn handler(f: impl Fn(&Event) + 'static) -> Self {
        PropValue::Handler(Rc::new(f))
    }

    pub fn any<T: 'static>(value: T) -> Self {
        PropValue::Any(Rc::new(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            PropValue::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The string form used when a value is written as text (`key`, `for`).
    pub fn to_text(&self) -> String {
        match self {
            PropValue::Str(s) => s.clone(),
            PropValue::Number(n) => format_number(*n),
            PropValue::Bool(b) => b.to_string(),
            PropValue::Classes(classes) => classes.serialize(),
            PropValue::Styles(styles) => styles.serialize(),
            PropValue::Element(element) => element.primitive_text().unwrap_or_default(),
            PropValue::Handler(_) | PropValue::Any(_) => String::new(),
        }
    }

    /// The attribute form: `None` means the attribute is absent.
    pub fn to_attribute(&self) -> Option<String> {
        match self {
            PropValue::Bool(false) => None,
            PropValue::Bool(true) => Some(String::new()),
            PropValue::Handler(_) | PropValue::Any(_) => None,
            PropValue::Element(element) => element.primitive_text(),
            other => Some(other.to_text()),
        }
    }

    pub(crate) fn into_classes(self) -> Classes {
        match self {
            PropValue::Classes(classes) => classes,
            PropValue::Str(s) => Classes::Name(s),
            PropValue::Handler(_) | PropValue::Any(_) => Classes::Absent,
            other => Classes::Name(other.to_text()),
        }
    }

    pub(crate) fn into_styles(self) -> Styles {
        match self {
            PropValue::Styles(styles) => styles,
            PropValue::Str(s) => Styles::Inline(s),
            PropValue::Handler(_) | PropValue::Any(_) => Styles::Inline(String::new()),
            other => Styles::Inline(other.to_text()),
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            PropValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            PropValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            PropValue::Classes(c) => f.debug_tuple("Classes").field(c).finish(),
            PropValue::Styles(s) => f.debug_tuple("Styles").field(s).finish(),
            PropValue::Handler(_) => f.write_str("Handler(..)"),
            PropValue::Element(e) => f.debug_tuple("Element").field(e).finish(),
            PropValue::Any(_) => f.write_str("Any(..)"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

macro_rules! impl_numeric_prop {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PropValue {
                fn from(value: $ty) -> Self {
                    PropValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_numeric_prop!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<Classes> for PropValue {
    fn from(value: Classes) -> Self {
        PropValue::Classes(value)
    }
}

impl From<Styles> for PropValue {
    fn from(value: Styles) -> Self {
        PropValue::Styles(value)
    }
}

impl From<Element> for PropValue {
    fn from(value: Element) -> Self {
        PropValue::Element(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

/// Property bag passed to intrinsic elements and components.
///
/// Keys are unique; setting an existing key replaces its value in place.
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set the `class` prop from any class value.
    pub fn class(self, classes: impl IntoClasses) -> Self {
        self.with("class", PropValue::Classes(classes.into_classes()))
    }

    /// Set the `style` prop from any style value.
    pub fn style(self, styles: impl IntoStyles) -> Self {
        self.with("style", PropValue::Styles(styles.into_styles()))
    }

    /// Set an event handler prop, e.g. `on("onClick", |e| ..)`.
    pub fn on(self, key: impl Into<String>, handler: impl Fn(&Event) + 'static) -> Self {
        self.with(key, PropValue::handler(handler))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_str)
    }

    /// Downcast an opaque [`PropValue::Any`] payload.
    pub fn get_as<T: 'static>(&self, key: &str) -> Option<&T> {
        match self.get(key)? {
            PropValue::Any(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge two prop bags; keys in `overrides` win.
    pub fn merge(defaults: Props, overrides: Props) -> Props {
        let mut merged = defaults;
        for (key, value) in overrides.entries {
            merged.set(key, value);
        }
        merged
    }
}

impl IntoIterator for Props {
    type Item = (String, PropValue);
    type IntoIter = std::vec::IntoIter<(String, PropValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (key, value) in iter {
            props.set(key, value);
        }
        props
    }
}

/// Build [`Props`] from `key => value` pairs.
///
/// ```ignore
/// let props = props! { "id" => "main", "tabIndex" => 0 };
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::element::Props::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::element::Props::new();
        $(
            props.set($key, $value);
        )+
        props
    }};
}
