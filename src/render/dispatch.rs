use std::borrow::Cow;

use crate::dom::{Document, NodeId};
use crate::element::{Element, Props};
use crate::error::RenderError;

use super::component::{invoke_component, Component};
use super::intrinsic::build_intrinsic;

/// What to create: an intrinsic tag or a component.
#[derive(Clone, Debug)]
pub enum ElementType {
    Tag(Cow<'static, str>),
    Component(Component),
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Tag(Cow::Owned(tag.to_string()))
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Tag(Cow::Owned(tag))
    }
}

impl From<Component> for ElementType {
    fn from(component: Component) -> Self {
        ElementType::Component(component)
    }
}

impl From<&Component> for ElementType {
    fn from(component: &Component) -> Self {
        ElementType::Component(component.clone())
    }
}

/// Create a node from a `(type, props, children)` triple.
pub fn create(
    doc: &mut Document,
    ty: impl Into<ElementType>,
    props: Option<Props>,
    children: Vec<Element>,
) -> Result<NodeId, RenderError> {
    match ty.into() {
        ElementType::Tag(tag) => Ok(build_intrinsic(doc, &tag, props, children)),
        ElementType::Component(component) => invoke_component(doc, &component, props, children),
    }
}

/// Shorthand for [`create`] with variadic children.
///
/// ```ignore
/// let list = h!(doc, "ul", None, h!(doc, "li", None, "one")?, "two")?;
/// ```
#[macro_export]
macro_rules! h {
    ($doc:expr, $ty:expr) => {
        $crate::render::create($doc, $ty, None, Vec::new())
    };
    ($doc:expr, $ty:expr, $props:expr $(, $child:expr)* $(,)?) => {{
        let children: Vec<$crate::element::Element> =
            vec![$($crate::element::Element::from($child)),*];
        $crate::render::create($doc, $ty, $props, children)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;

    #[test]
    fn test_tag_dispatch() {
        let mut doc = Document::new();
        let node = create(&mut doc, "div", Some(props! { "id" => "x" }), vec![]).unwrap();
        assert_eq!(doc.tag(node), Some("div"));
        assert_eq!(doc.element(node).unwrap().id(), "x");
    }

    #[test]
    fn test_component_dispatch() {
        let mut doc = Document::new();
        let component = Component::new("Echo", |_, _, children| Ok(Element::Fragment(children)));
        let node = create(&mut doc, &component, None, vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(doc.text_content(node), "ab");
    }

    #[test]
    fn test_h_macro_nesting() {
        let mut doc = Document::new();
        let doc = &mut doc;
        let item = h!(doc, "li", None, "one").unwrap();
        let list = h!(doc, "ul", None, item, h!(doc, "li", None, 2).unwrap()).unwrap();
        assert_eq!(doc.to_html(list), "<ul><li>one</li><li>2</li></ul>");

        let rule = h!(doc, "hr").unwrap();
        assert_eq!(doc.to_html(rule), "<hr>");
    }
}
