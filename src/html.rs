//! Static registry of intrinsic elements.
//!
//! The schema lists the tags the runtime knows, the properties each tag
//! exposes and how many children it accepts. At runtime it only answers
//! "does this element expose that property"; the prop/children validation
//! is a development aid that reports diagnostics in debug builds.

use bitflags::bitflags;

use crate::element::Props;

bitflags! {
    /// Native capabilities of an element that the intrinsic builder probes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementTraits: u8 {
        /// Exposes a `name` property (`key` backfills it).
        const NAME = 1 << 0;
        /// Exposes the label association (`for`).
        const LABEL_FOR = 1 << 1;
        /// Void element: serialized without a closing tag.
        const VOID = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildCardinality {
    /// No children allowed.
    None,
    /// Exactly one child.
    Alone,
    /// One or more children required.
    Many,
    /// Any number of children.
    Any,
}

impl ChildCardinality {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            ChildCardinality::None => count == 0,
            ChildCardinality::Alone => count == 1,
            ChildCardinality::Many => count >= 1,
            ChildCardinality::Any => true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TagSpec {
    pub tag: &'static str,
    /// Tag-specific properties, lower-cased.
    pub props: &'static [&'static str],
    pub children: ChildCardinality,
    pub traits: ElementTraits,
}

const fn tag(tag: &'static str) -> TagSpec {
    TagSpec {
        tag,
        props: &[],
        children: ChildCardinality::Any,
        traits: ElementTraits::empty(),
    }
}

/// Properties every element exposes.
pub const GLOBAL_PROPERTIES: &[&str] = &[
    "id",
    "title",
    "lang",
    "dir",
    "hidden",
    "tabindex",
    "accesskey",
    "draggable",
    "translate",
    "spellcheck",
    "autofocus",
    "inert",
    "role",
];

/// Event handler properties every element exposes.
pub const GLOBAL_EVENTS: &[&str] = &[
    "onclick",
    "ondblclick",
    "onmousedown",
    "onmouseup",
    "onmouseover",
    "onmouseout",
    "onmousemove",
    "onkeydown",
    "onkeyup",
    "onkeypress",
    "onfocus",
    "onblur",
    "oninput",
    "onchange",
    "onscroll",
    "onwheel",
    "oncontextmenu",
];

/// Prop keys with dedicated handling in the intrinsic builder.
pub const RESERVED_PROPS: &[&str] = &["id", "key", "class", "style", "for"];

pub static ELEMENTS: &[TagSpec] = &[
    tag("div"),
    tag("span"),
    tag("main"),
    tag("section"),
    TagSpec {
        children: ChildCardinality::None,
        traits: ElementTraits::VOID,
        ..tag("hr")
    },
    tag("p"),
    tag("ul"),
    tag("ol"),
    tag("dl"),
    tag("li"),
    tag("dt"),
    tag("dd"),
    tag("pre"),
    TagSpec {
        props: &["open"],
        children: ChildCardinality::Many,
        ..tag("details")
    },
    tag("summary"),
    tag("h1"),
    tag("h2"),
    tag("h3"),
    tag("h4"),
    tag("h5"),
    tag("h6"),
    TagSpec {
        props: &["type", "src", "async"],
        children: ChildCardinality::Alone,
        ..tag("script")
    },
    TagSpec {
        props: &["name", "action", "method", "onsubmit"],
        traits: ElementTraits::NAME,
        ..tag("form")
    },
    TagSpec {
        props: &["for"],
        traits: ElementTraits::LABEL_FOR,
        ..tag("label")
    },
    TagSpec {
        props: &[
            "type",
            "name",
            "value",
            "placeholder",
            "disabled",
            "required",
            "accept",
            "multiple",
            "webkitdirectory",
            "directory",
            "onchange",
        ],
        children: ChildCardinality::None,
        traits: ElementTraits::NAME.union(ElementTraits::VOID),
        ..tag("input")
    },
    TagSpec {
        props: &["type", "name", "value", "disabled"],
        traits: ElementTraits::NAME,
        ..tag("button")
    },
];

pub fn lookup(tag: &str) -> Option<&'static TagSpec> {
    ELEMENTS.iter().find(|spec| spec.tag == tag)
}

/// Capabilities of `tag`; unknown tags have none.
pub fn traits(tag: &str) -> ElementTraits {
    lookup(tag).map_or(ElementTraits::empty(), |spec| spec.traits)
}

/// Whether an element with `tag` natively exposes the (lower-cased) property.
pub fn exposes(tag: &str, property: &str) -> bool {
    GLOBAL_PROPERTIES.contains(&property)
        || GLOBAL_EVENTS.contains(&property)
        || lookup(tag).is_some_and(|spec| spec.props.contains(&property))
}

/// Check props and child count against the schema.
///
/// Returns one message per mismatch. Unknown tags are reported once and
/// otherwise not checked.
pub fn validate(tag: &str, props: Option<&Props>, child_count: usize) -> Vec<String> {
    let Some(spec) = lookup(tag) else {
        return vec![format!("unknown intrinsic element <{tag}>")];
    };

    let mut issues = Vec::new();
    if let Some(props) = props {
        for key in props.keys() {
            let lower = key.to_lowercase();
            let known = RESERVED_PROPS.contains(&key) || exposes(tag, &lower);
            if !known {
                issues.push(format!("<{tag}> does not declare prop `{key}`"));
            }
        }
    }
    if !spec.children.accepts(child_count) {
        issues.push(format!(
            "<{tag}> expects {:?} children, got {child_count}",
            spec.children
        ));
    }
    issues
}
