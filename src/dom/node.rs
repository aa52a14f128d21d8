use std::fmt;
use std::rc::Rc;

use crate::element::PropValue;
use crate::html::{self, ElementTraits};

use super::NodeId;

/// Event passed to handlers registered through `on*` props.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Event name without the `on` prefix, e.g. `click`.
    pub kind: String,
    pub target: NodeId,
}

pub type EventHandler = Rc<dyn Fn(&Event)>;

#[derive(Clone, Debug)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    /// Fragment or empty stand-in: a node with children and no markup of
    /// its own.
    Container,
}

/// Native state of an element node.
#[derive(Clone)]
pub struct ElementData {
    pub(crate) tag: String,
    pub(crate) traits: ElementTraits,
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) class_name: String,
    pub(crate) style: String,
    pub(crate) key: Option<String>,
    pub(crate) html_for: Option<String>,
    pub(crate) attributes: Vec<(String, PropValue)>,
    pub(crate) handlers: Vec<(String, EventHandler)>,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            traits: html::traits(tag),
            id: String::new(),
            name: String::new(),
            class_name: String::new(),
            style: String::new(),
            key: None,
            html_for: None,
            attributes: Vec::new(),
            handlers: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn traits(&self) -> ElementTraits {
        self.traits
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Inline style text.
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Framework-level key slot.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Label association target.
    pub fn html_for(&self) -> Option<&str> {
        self.html_for.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&PropValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn has_handler(&self, property: &str) -> bool {
        self.handler(property).is_some()
    }

    pub(crate) fn handler(&self, property: &str) -> Option<&EventHandler> {
        self.handlers
            .iter()
            .find(|(n, _)| n == property)
            .map(|(_, h)| h)
    }

    /// Whether the element exposes `property` (lower-cased): globally, via
    /// its schema entry, or because an attribute of that name already exists.
    pub fn exposes(&self, property: &str) -> bool {
        html::exposes(&self.tag, property) || self.attribute(property).is_some()
    }

    /// Assign a native property. Returns `false` when the value cannot be
    /// written (e.g. a non-handler value for an `on*` property).
    pub(crate) fn set_property(&mut self, property: &str, value: PropValue) -> bool {
        match property {
            "id" => {
                self.id = value.to_text();
                true
            }
            "name" if self.traits.contains(ElementTraits::NAME) => {
                self.name = value.to_text();
                true
            }
            event if event.starts_with("on") && html::exposes(&self.tag, event) => match value {
                PropValue::Handler(handler) => {
                    match self.handlers.iter_mut().find(|(n, _)| n == event) {
                        Some(entry) => entry.1 = handler,
                        None => self.handlers.push((event.to_string(), handler)),
                    }
                    true
                }
                _ => false,
            },
            _ => {
                if matches!(value, PropValue::Handler(_)) {
                    return false;
                }
                match self.attributes.iter_mut().find(|(n, _)| n == property) {
                    Some(entry) => entry.1 = value,
                    None => self.attributes.push((property.to_string(), value)),
                }
                true
            }
        }
    }
}

impl fmt::Debug for ElementData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: Vec<_> = self.handlers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("ElementData")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("class_name", &self.class_name)
            .field("style", &self.style)
            .field("key", &self.key)
            .field("html_for", &self.html_for)
            .field("attributes", &self.attributes)
            .field("handlers", &handlers)
            .finish()
    }
}
