//! Element to node resolution.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::dom::{Document, NodeId, NodeKind};
use crate::element::{format_number, Element};

/// Resolve an element into exactly one node of `doc`.
///
/// Primitives become text nodes, fragments become a container holding their
/// materialized members, and existing nodes are passed through unchanged so
/// live nodes keep their identity.
pub fn materialize(doc: &mut Document, element: Element) -> NodeId {
    match element {
        Element::Empty => doc.create_container(),
        Element::Text(text) => doc.create_text(text),
        Element::Number(n) => doc.create_text(format_number(n)),
        Element::Bool(b) => doc.create_text(b.to_string()),
        Element::Node(id) => {
            if !doc.contains(id) {
                doc.report(Diagnostic::new(
                    DiagnosticKind::UnrecognizedElement,
                    format!("unrecognized element: node {id:?} does not belong to this document"),
                ));
            }
            id
        }
        Element::Fragment(items) => {
            let container = doc.create_container();
            for item in items {
                let child = materialize(doc, item);
                doc.append_child(container, child);
            }
            container
        }
    }
}

/// A fresh empty container.
pub fn create_empty(doc: &mut Document) -> NodeId {
    doc.create_container()
}

/// A container holding the materialized `children`, in order.
pub fn create_fragment<I, T>(doc: &mut Document, children: I) -> NodeId
where
    I: IntoIterator<Item = T>,
    T: Into<Element>,
{
    materialize(doc, Element::fragment(children))
}

/// Coerce any element into an element node.
///
/// An element node is returned as is, a container is replaced by a `div`
/// adopting its children, text is wrapped in a `p`. Anything else yields an
/// empty `div`.
pub fn to_element(doc: &mut Document, element: Element) -> NodeId {
    let node = materialize(doc, element);
    match doc.kind(node) {
        Some(NodeKind::Element(_)) => node,
        Some(NodeKind::Container) => {
            let div = doc.create_element("div");
            let children = doc.children(node).to_vec();
            for child in children {
                doc.append_child(div, child);
            }
            div
        }
        Some(NodeKind::Text(_)) => {
            let p = doc.create_element("p");
            doc.append_child(p, node);
            p
        }
        None => doc.create_element("div"),
    }
}

/// Outer markup of `element` after coercing it with [`to_element`].
pub fn to_html(doc: &mut Document, element: Element) -> String {
    let node = to_element(doc, element);
    doc.to_html(node)
}
