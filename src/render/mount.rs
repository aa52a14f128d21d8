use crate::dom::{Document, NodeId};
use crate::element::Element;

use super::materialize::materialize;

/// Materialize `element` and make it the only child of `root`.
pub fn attach(doc: &mut Document, root: NodeId, element: impl Into<Element>) -> NodeId {
    let node = materialize(doc, element.into());
    doc.replace_children(root, &[node]);
    node
}

/// Materialize `element` and append it to `root`.
pub fn append(doc: &mut Document, root: NodeId, element: impl Into<Element>) -> NodeId {
    let node = materialize(doc, element.into());
    doc.append_child(root, node);
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_replaces_children() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        append(&mut doc, root, "a");
        append(&mut doc, root, "b");
        assert_eq!(doc.children(root).len(), 2);

        let node = attach(&mut doc, root, "c");
        assert_eq!(doc.children(root), &[node]);
        assert_eq!(doc.text_content(root), "c");
    }

    #[test]
    fn test_attach_is_idempotent_in_end_state() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        attach(&mut doc, root, "x");
        attach(&mut doc, root, "x");
        assert_eq!(doc.to_html(root), "<div>x</div>");
    }

    #[test]
    fn test_attach_existing_child_keeps_identity() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let span = doc.create_element("span");
        append(&mut doc, root, span);

        assert_eq!(attach(&mut doc, root, span), span);
        assert_eq!(doc.children(root), &[span]);
    }
}
