use crate::css;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::dom::{Document, NodeId};
use crate::element::{Element, Props};
use crate::html::{self, ElementTraits};

use super::materialize::materialize;

/// Build an element node for `tag`.
///
/// Any tag name creates an element; the schema is only consulted to report
/// mismatches in debug builds. Empty children are skipped, so the node ends
/// up with one child per non-empty entry.
pub fn build_intrinsic(
    doc: &mut Document,
    tag: &str,
    props: Option<Props>,
    children: Vec<Element>,
) -> NodeId {
    if cfg!(debug_assertions) {
        let child_count = children.iter().filter(|c| !c.is_empty()).count();
        for issue in html::validate(tag, props.as_ref(), child_count) {
            doc.report(Diagnostic::new(DiagnosticKind::SchemaMismatch, issue).with_tag(tag));
        }
    }

    let node = doc.create_element(tag);
    if let Some(props) = props {
        apply_props(doc, node, props);
    }

    for child in children {
        if child.is_empty() {
            continue;
        }
        let child = materialize(doc, child);
        doc.append_child(node, child);
    }
    node
}

fn apply_props(doc: &mut Document, node: NodeId, props: Props) {
    let mut rejected = Vec::new();
    {
        let Some(el) = doc.element_mut(node) else {
            return;
        };
        let mut key = None;

        for (name, value) in props {
            match name.as_str() {
                "class" => el.class_name = css::class_names(&[value.into_classes()]),
                "style" => el.style = css::styles(&[value.into_styles()]),
                "key" => key = Some(value.to_text()),
                "for" => {
                    if el.traits.contains(ElementTraits::LABEL_FOR) {
                        el.html_for = Some(value.to_text());
                    } else {
                        log::debug!("<{}> has no label association, skipping `for`", el.tag);
                    }
                }
                _ => {
                    let property = name.to_lowercase();
                    if !(el.exposes(&property) && el.set_property(&property, value)) {
                        rejected.push(Diagnostic::property_not_writable(&el.tag, &name));
                    }
                }
            }
        }

        // Backfilled after all props so an explicit id or name always wins.
        if let Some(key) = key {
            if el.traits.contains(ElementTraits::NAME) && el.name.is_empty() {
                el.name = key.clone();
            }
            if el.id.is_empty() {
                el.id = key.clone();
            }
            el.key = Some(key);
        }
    }

    for diagnostic in rejected {
        doc.report(diagnostic);
    }
}
