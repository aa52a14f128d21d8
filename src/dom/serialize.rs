//! Markup serialization of document nodes.

use crate::html::ElementTraits;

use super::node::{ElementData, NodeKind};
use super::{Document, NodeId};

impl Document {
    /// Serialize a node and its subtree to markup.
    ///
    /// Containers have no markup of their own and serialize as their
    /// children. Stale ids serialize to an empty string.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize only the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => escape_into(text, false, out),
            Some(NodeKind::Container) => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            Some(NodeKind::Element(data)) => {
                out.push('<');
                out.push_str(&data.tag);
                write_attributes(data, out);
                out.push('>');
                if data.traits.contains(ElementTraits::VOID) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&data.tag);
                out.push('>');
            }
            None => {}
        }
    }
}

fn write_attributes(data: &ElementData, out: &mut String) {
    let named = [
        ("id", data.id.as_str()),
        ("name", data.name.as_str()),
        ("class", data.class_name.as_str()),
        ("style", data.style.as_str()),
    ];
    for (name, value) in named {
        if !value.is_empty() {
            write_attribute(name, value, out);
        }
    }
    if let Some(target) = &data.html_for {
        write_attribute("for", target, out);
    }

    for (name, value) in &data.attributes {
        match value.to_attribute() {
            Some(text) if text.is_empty() => {
                out.push(' ');
                out.push_str(name);
            }
            Some(text) => write_attribute(name, &text, out),
            None => {}
        }
    }
}

fn write_attribute(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(value, true, out);
    out.push('"');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::element::PropValue;

    use super::*;

    #[test]
    fn test_element_with_attributes() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let text = doc.create_text("a < b");
        doc.append_child(div, text);
        if let Some(el) = doc.element_mut(div) {
            el.class_name = "x y".into();
            el.style = "color: red;".into();
            el.set_property("title", PropValue::from("say \"hi\""));
            el.set_property("hidden", PropValue::from(true));
            el.set_property("draggable", PropValue::from(false));
        }

        assert_eq!(
            doc.to_html(div),
            "<div class=\"x y\" style=\"color: red;\" title=\"say &quot;hi&quot;\" hidden>a &lt; b</div>"
        );
    }

    #[test]
    fn test_void_elements_and_containers() {
        let mut doc = Document::new();
        let container = doc.create_container();
        let hr = doc.create_element("hr");
        let span = doc.create_element("span");
        doc.append_child(container, hr);
        doc.append_child(container, span);

        assert_eq!(doc.to_html(container), "<hr><span></span>");
        assert_eq!(doc.inner_html(container), "<hr><span></span>");
    }
}
