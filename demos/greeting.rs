use tagtree::css::Classes;
use tagtree::prelude::*;

#[component(on_attach = announce)]
fn greeting(
    doc: &mut Document,
    props: &Props,
    _children: Vec<Element>,
) -> Result<Element, RenderError> {
    let name = props.get_str("name").unwrap_or("world").to_string();
    let excited = props.get("excited").and_then(PropValue::as_bool).unwrap_or(false);

    let classes = Classes::flags()
        .with("greeting", true)
        .with("greeting--excited", excited);
    let styles = Styles::new().with("font-weight", excited.then_some("bold"));

    let heading = h!(
        doc,
        "h1",
        Some(Props::new().class(classes).style(styles)),
        "Hello, ",
        name
    )?;
    let button = h!(
        doc,
        "button",
        Some(Props::new().on("onClick", |event| {
            log::info!("clicked {:?}", event.target);
        })),
        "Wave"
    )?;
    Ok(Element::fragment([heading, button]))
}

fn announce(doc: &mut Document, node: NodeId) {
    log::info!("greeting attached: {}", doc.to_html(node));
}

fn main() {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    let body = doc.body();
    doc.append_child(body, root);

    let app = App::new()
        .with_body(greeting())
        .mount_point(root)
        .init_props(|_| props! { "name" => "tagtree", "excited" => true });

    if let Err(err) = app.render(&mut doc) {
        log::error!("render failed: {err}");
    }
    app.settle(&mut doc);

    println!("{}", doc.inner_html(root));
}
