//! CSS class and inline style serialization.
//!
//! Style and class values come in several shapes (literals, lists, lazy
//! getters, flag maps). Everything here serializes to a plain string and
//! never fails: an ignored entry simply contributes an empty string.
//!
//! ```ignore
//! let class = cls!("btn", ["primary", "large"], Classes::flags().with("active", is_active));
//! let style = styles!(Styles::new().with("color", "red").with("margin", [4, 8]));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::element::format_number;

/// A literal style setting: a string or a number.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => f.write_str(s),
            Literal::Num(n) => f.write_str(&format_number(*n)),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

macro_rules! impl_numeric_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Literal::Num(value as f64)
                }
            }
        )*
    };
}

impl_numeric_literal!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

/// The value half of a single `key: value` style declaration.
#[derive(Clone)]
pub enum StyleValue {
    /// Renders nothing (`false`, `None`).
    Ignore,
    /// Renders the bare key (`true`), for flag-like declarations.
    Include,
    /// Renders `key: value;`.
    Literal(Literal),
    /// Renders `key: v1 v2 ...` (no trailing semicolon).
    List(Vec<Literal>),
    /// Evaluated once per serialization pass, never memoized.
    Lazy(Rc<dyn Fn() -> StyleValue>),
}

impl fmt::Debug for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Ignore => f.write_str("Ignore"),
            StyleValue::Include => f.write_str("Include"),
            StyleValue::Literal(l) => f.debug_tuple("Literal").field(l).finish(),
            StyleValue::List(l) => f.debug_tuple("List").field(l).finish(),
            StyleValue::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Trait for types that can be used as a style declaration value.
pub trait IntoStyleValue {
    fn into_style_value(self) -> StyleValue;
}

impl IntoStyleValue for StyleValue {
    fn into_style_value(self) -> StyleValue {
        self
    }
}

impl IntoStyleValue for bool {
    fn into_style_value(self) -> StyleValue {
        if self {
            StyleValue::Include
        } else {
            StyleValue::Ignore
        }
    }
}

impl IntoStyleValue for &str {
    fn into_style_value(self) -> StyleValue {
        StyleValue::Literal(self.into())
    }
}

impl IntoStyleValue for String {
    fn into_style_value(self) -> StyleValue {
        StyleValue::Literal(self.into())
    }
}

macro_rules! impl_numeric_style_value {
    ($($ty:ty),*) => {
        $(
            impl IntoStyleValue for $ty {
                fn into_style_value(self) -> StyleValue {
                    StyleValue::Literal(self.into())
                }
            }
        )*
    };
}

impl_numeric_style_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl<T: IntoStyleValue> IntoStyleValue for Option<T> {
    fn into_style_value(self) -> StyleValue {
        match self {
            Some(value) => value.into_style_value(),
            None => StyleValue::Ignore,
        }
    }
}

impl<T: Into<Literal>> IntoStyleValue for Vec<T> {
    fn into_style_value(self) -> StyleValue {
        StyleValue::List(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Literal>, const N: usize> IntoStyleValue for [T; N] {
    fn into_style_value(self) -> StyleValue {
        StyleValue::List(self.into_iter().map(Into::into).collect())
    }
}

impl<F, V> IntoStyleValue for F
where
    F: Fn() -> V + 'static,
    V: IntoStyleValue,
{
    fn into_style_value(self) -> StyleValue {
        let getter = self;
        StyleValue::Lazy(Rc::new(move || getter().into_style_value()))
    }
}

/// Serialize a single style declaration.
///
/// | value         | output          |
/// |---------------|-----------------|
/// | ignore        | `""`            |
/// | include       | `key`           |
/// | literal       | `key: value;`   |
/// | list          | `key: v1 v2`    |
/// | lazy          | the resolved value, serialized |
pub fn style(key: &str, value: &StyleValue) -> String {
    match value {
        StyleValue::Ignore => String::new(),
        StyleValue::Include => key.to_string(),
        StyleValue::Literal(literal) => format!("{key}: {literal};"),
        StyleValue::List(items) => {
            let joined = items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            format!("{key}: {joined}")
        }
        StyleValue::Lazy(getter) => style(key, &getter()),
    }
}

/// An inline style value: a raw fragment, a list of styles, or a
/// key → value map serialized in insertion order.
#[derive(Clone, Debug)]
pub enum Styles {
    Inline(String),
    List(Vec<Styles>),
    Map(Vec<(String, StyleValue)>),
}

impl Styles {
    /// An empty style map.
    pub fn new() -> Self {
        Styles::Map(Vec::new())
    }

    /// Add a declaration. A non-map value is first wrapped into a list so
    /// that nothing already present is lost.
    pub fn with(self, key: impl Into<String>, value: impl IntoStyleValue) -> Self {
        let entry = (key.into(), value.into_style_value());
        match self {
            Styles::Map(mut entries) => {
                entries.push(entry);
                Styles::Map(entries)
            }
            other => Styles::List(vec![other, Styles::Map(vec![entry])]),
        }
    }

    pub fn serialize(&self) -> String {
        match self {
            Styles::Inline(text) => text.clone(),
            Styles::List(items) => items.iter().map(Styles::serialize).collect(),
            Styles::Map(entries) => entries
                .iter()
                .map(|(key, value)| style(key, value))
                .collect(),
        }
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for types that can be used as an inline style value.
pub trait IntoStyles {
    fn into_styles(self) -> Styles;
}

impl IntoStyles for Styles {
    fn into_styles(self) -> Styles {
        self
    }
}

impl IntoStyles for &str {
    fn into_styles(self) -> Styles {
        Styles::Inline(self.to_string())
    }
}

impl IntoStyles for String {
    fn into_styles(self) -> Styles {
        Styles::Inline(self)
    }
}

impl<T: IntoStyles> IntoStyles for Vec<T> {
    fn into_styles(self) -> Styles {
        Styles::List(self.into_iter().map(IntoStyles::into_styles).collect())
    }
}

impl<T: IntoStyles, const N: usize> IntoStyles for [T; N] {
    fn into_styles(self) -> Styles {
        Styles::List(self.into_iter().map(IntoStyles::into_styles).collect())
    }
}

/// Serialize several style values, concatenated without a separator.
pub fn styles(values: &[Styles]) -> String {
    values.iter().map(Styles::serialize).collect()
}

/// A boolean flag in a class map, possibly computed on demand.
#[derive(Clone)]
pub enum Flag {
    Bool(bool),
    Lazy(Rc<dyn Fn() -> bool>),
}

impl Flag {
    pub fn get(&self) -> bool {
        match self {
            Flag::Bool(value) => *value,
            Flag::Lazy(getter) => getter(),
        }
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Flag::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

pub trait IntoFlag {
    fn into_flag(self) -> Flag;
}

impl IntoFlag for bool {
    fn into_flag(self) -> Flag {
        Flag::Bool(self)
    }
}

impl<F> IntoFlag for F
where
    F: Fn() -> bool + 'static,
{
    fn into_flag(self) -> Flag {
        Flag::Lazy(Rc::new(self))
    }
}

/// A class attribute value.
#[derive(Clone)]
pub enum Classes {
    Absent,
    Name(String),
    Lazy(Rc<dyn Fn() -> Option<String>>),
    List(Vec<Classes>),
    /// Names included when their flag is set, in insertion order.
    Flags(Vec<(String, Flag)>),
}

impl Classes {
    /// An empty class flag map.
    pub fn flags() -> Self {
        Classes::Flags(Vec::new())
    }

    /// Add a flagged class name. A non-map value is wrapped into a list.
    pub fn with(self, name: impl Into<String>, flag: impl IntoFlag) -> Self {
        let entry = (name.into(), flag.into_flag());
        match self {
            Classes::Flags(mut entries) => {
                entries.push(entry);
                Classes::Flags(entries)
            }
            other => Classes::List(vec![other, Classes::Flags(vec![entry])]),
        }
    }

    pub fn serialize(&self) -> String {
        match self {
            Classes::Absent => String::new(),
            Classes::Name(name) => name.clone(),
            Classes::Lazy(getter) => getter().unwrap_or_default(),
            Classes::List(items) => class_names(items),
            Classes::Flags(entries) => entries
                .iter()
                .filter(|(_, flag)| flag.get())
                .map(|(name, _)| name.as_str())
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl fmt::Debug for Classes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classes::Absent => f.write_str("Absent"),
            Classes::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Classes::Lazy(_) => f.write_str("Lazy(..)"),
            Classes::List(items) => f.debug_tuple("List").field(items).finish(),
            Classes::Flags(entries) => f.debug_tuple("Flags").field(entries).finish(),
        }
    }
}

/// Output of a lazy class getter: a name or nothing.
pub trait IntoClassName {
    fn into_class_name(self) -> Option<String>;
}

impl IntoClassName for String {
    fn into_class_name(self) -> Option<String> {
        Some(self)
    }
}

impl IntoClassName for &'static str {
    fn into_class_name(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoClassName for Option<String> {
    fn into_class_name(self) -> Option<String> {
        self
    }
}

impl IntoClassName for Option<&'static str> {
    fn into_class_name(self) -> Option<String> {
        self.map(str::to_string)
    }
}

/// Trait for types that can be used as a class value.
pub trait IntoClasses {
    fn into_classes(self) -> Classes;
}

impl IntoClasses for Classes {
    fn into_classes(self) -> Classes {
        self
    }
}

impl IntoClasses for &str {
    fn into_classes(self) -> Classes {
        Classes::Name(self.to_string())
    }
}

impl IntoClasses for String {
    fn into_classes(self) -> Classes {
        Classes::Name(self)
    }
}

impl<T: IntoClasses> IntoClasses for Option<T> {
    fn into_classes(self) -> Classes {
        match self {
            Some(value) => value.into_classes(),
            None => Classes::Absent,
        }
    }
}

impl<T: IntoClasses> IntoClasses for Vec<T> {
    fn into_classes(self) -> Classes {
        Classes::List(self.into_iter().map(IntoClasses::into_classes).collect())
    }
}

impl<T: IntoClasses, const N: usize> IntoClasses for [T; N] {
    fn into_classes(self) -> Classes {
        Classes::List(self.into_iter().map(IntoClasses::into_classes).collect())
    }
}

impl<F, O> IntoClasses for F
where
    F: Fn() -> O + 'static,
    O: IntoClassName,
{
    fn into_classes(self) -> Classes {
        let getter = self;
        Classes::Lazy(Rc::new(move || getter().into_class_name()))
    }
}

/// Serialize several class values, space-joined.
///
/// Empty contributions keep their separator, so `["a", absent, "b"]`
/// yields `"a  b"`.
pub fn class_names(values: &[Classes]) -> String {
    values
        .iter()
        .map(Classes::serialize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a class string from heterogeneous class values.
#[macro_export]
macro_rules! cls {
    ($($value:expr),* $(,)?) => {
        $crate::css::class_names(&[$($crate::css::IntoClasses::into_classes($value)),*])
    };
}

/// Build an inline style string from heterogeneous style values.
#[macro_export]
macro_rules! styles {
    ($($value:expr),* $(,)?) => {
        $crate::css::styles(&[$($crate::css::IntoStyles::into_styles($value)),*])
    };
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_style_ignore_and_include() {
        assert_eq!(style("color", &false.into_style_value()), "");
        assert_eq!(style("color", &None::<&str>.into_style_value()), "");
        assert_eq!(style("color", &true.into_style_value()), "color");
    }

    #[test]
    fn test_style_literals() {
        assert_eq!(style("color", &"red".into_style_value()), "color: red;");
        assert_eq!(style("opacity", &0.5.into_style_value()), "opacity: 0.5;");
        assert_eq!(style("z-index", &3.into_style_value()), "z-index: 3;");
    }

    #[test]
    fn test_style_list_has_no_trailing_semicolon() {
        assert_eq!(style("margin", &[1, 2].into_style_value()), "margin: 1 2");
        assert_eq!(
            style("font-family", &vec!["a", "b"].into_style_value()),
            "font-family: a b"
        );
    }

    #[test]
    fn test_style_lazy_evaluated_each_pass() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let value = (move || {
            counter.set(counter.get() + 1);
            "blue"
        })
        .into_style_value();

        assert_eq!(style("color", &value), "color: blue;");
        assert_eq!(style("color", &value), "color: blue;");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_style_lazy_resolving_to_flag() {
        assert_eq!(style("hidden", &(|| true).into_style_value()), "hidden");
        assert_eq!(style("hidden", &(|| false).into_style_value()), "");
    }

    #[test]
    fn test_styles_concatenates_without_separator() {
        let map = Styles::new()
            .with("color", "red")
            .with("display", false)
            .with("margin", [0, 4]);
        assert_eq!(map.serialize(), "color: red;margin: 0 4");

        assert_eq!(
            styles!["color: red;", vec!["top: 0;", "left: 0;"]],
            "color: red;top: 0;left: 0;"
        );
    }

    #[test]
    fn test_styles_with_on_inline_keeps_fragment() {
        let s = "color: red;".into_styles().with("top", 0);
        assert_eq!(s.serialize(), "color: red;top: 0;");
    }

    #[test]
    fn test_class_names_mixed() {
        let flags = Classes::flags().with("d", true).with("e", false);
        assert_eq!(cls!("a", ["b", "c"], flags), "a b c d");
    }

    #[test]
    fn test_class_names_keeps_empty_separator() {
        assert_eq!(cls!("a", None::<&str>, "b"), "a  b");
        assert_eq!(cls!(), "");
    }

    #[test]
    fn test_class_lazy_values() {
        let active = Rc::new(Cell::new(false));
        let flag = active.clone();
        let classes = Classes::flags().with("active", move || flag.get());
        assert_eq!(classes.serialize(), "");
        active.set(true);
        assert_eq!(classes.serialize(), "active");

        assert_eq!(cls!(|| "lazy"), "lazy");
        assert_eq!(cls!(|| None::<String>), "");
    }

    #[test]
    fn test_number_literals_are_canonical() {
        assert_eq!(Literal::from(1.0).to_string(), "1");
        assert_eq!(Literal::from(f64::INFINITY).to_string(), "Infinity");
    }
}
