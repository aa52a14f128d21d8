use std::cell::Cell;

use tagtree::prelude::*;

thread_local! {
    static ATTACHED: Cell<u32> = const { Cell::new(0) };
}

fn shout(element: &Element) -> Result<Option<Element>, RenderError> {
    Ok(element
        .primitive_text()
        .map(|text| Element::from(text.to_uppercase())))
}

fn count_attach(_doc: &mut Document, _node: NodeId) {
    ATTACHED.with(|count| count.set(count.get() + 1));
}

/// Says hello.
#[component]
fn hello(
    _doc: &mut Document,
    props: &Props,
    _children: Vec<Element>,
) -> Result<Element, RenderError> {
    let name = props.get_str("name").unwrap_or("world");
    Ok(format!("hello, {name}").into())
}

#[component(name = "Loud", on_create = shout, on_attach = count_attach)]
fn loud(
    _doc: &mut Document,
    _props: &Props,
    children: Vec<Element>,
) -> Result<Element, RenderError> {
    Ok(children.into_iter().next().unwrap_or_default())
}

#[component]
fn card(
    doc: &mut Document,
    props: &Props,
    children: Vec<Element>,
) -> Result<Element, RenderError> {
    let title = props.get_str("title").unwrap_or_default().to_string();
    let heading = h!(doc, "h3", None, title)?;
    let body = create(doc, "div", None, children)?;
    let card = h!(doc, "section", Some(Props::new().class("card")), heading, body)?;
    Ok(card.into())
}

#[test]
fn default_name_is_function_name() {
    assert_eq!(hello().name(), "hello");
    assert_eq!(loud().name(), "Loud");
    assert!(loud().has_on_create());
    assert!(loud().has_on_attach());
    assert!(!hello().has_on_attach());
}

#[test]
fn generated_component_renders() {
    let mut doc = Document::new();
    let node = create(&mut doc, hello(), Some(props! { "name" => "macro" }), vec![]).unwrap();
    assert_eq!(doc.text(node), Some("hello, macro"));
}

#[test]
fn hooks_are_wired() {
    let mut doc = Document::new();
    let node = create(&mut doc, loud(), None, vec!["quiet".into()]).unwrap();
    assert_eq!(doc.text(node), Some("QUIET"));

    let body = doc.body();
    doc.append_child(body, node);
    doc.flush();
    doc.flush();
    assert_eq!(ATTACHED.with(Cell::get), 1);
}

#[test]
fn components_compose() {
    let mut doc = Document::new();
    let inner = create(&mut doc, hello(), None, vec![]).unwrap();
    let node = create(
        &mut doc,
        card(),
        Some(props! { "title" => "Greeting" }),
        vec![Element::Node(inner)],
    )
    .unwrap();
    assert_eq!(
        doc.to_html(node),
        "<section class=\"card\"><h3>Greeting</h3><div>hello, world</div></section>"
    );
}
