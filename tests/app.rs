use std::time::Duration;

use tagtree::app::render_fallback;
use tagtree::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Config {
    greeting: &'static str,
}

fn mounted() -> (Document, NodeId) {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    let body = doc.body();
    doc.append_child(body, root);
    (doc, root)
}

fn failing() -> Component {
    Component::new("Failing", |_, _, _| {
        Err(RenderError::Component {
            message: "Cannot read <config>".into(),
            trace: None,
        })
    })
}

#[test]
fn render_uses_config_through_default_props() {
    init_logger();
    let (mut doc, root) = mounted();
    let body = Component::new("Hello", |_, props, _| {
        let greeting = props.get_str("greeting").unwrap_or_default();
        let name = props.get_str("name").unwrap_or("stranger");
        Ok(Element::from(format!("{greeting}, {name}")))
    });
    let app = App::init(Config { greeting: "Hi" })
        .with_body(body)
        .mount_point(root)
        .init_props(|app| {
            Props::new()
                .with("greeting", app.config().greeting)
                .with("name", "everyone")
        });

    app.render(&mut doc).unwrap();
    assert_eq!(doc.text_content(root), "Hi, everyone");

    app.render_with(&mut doc, Some(props! { "name" => "Ada" })).unwrap();
    assert_eq!(doc.text_content(root), "Hi, Ada");
    assert_eq!(doc.children(root).len(), 1);
}

#[test]
fn failing_render_shows_message_and_returns_error() {
    init_logger();
    let (mut doc, root) = mounted();
    let app = App::new().with_body(failing()).mount_point(root);

    let err = app.render(&mut doc).unwrap_err();
    assert_eq!(err.to_string(), "Cannot read <config>");
    assert!(err.trace().is_none());

    assert!(doc.text_content(root).contains("Cannot read <config>"));
    assert_eq!(
        doc.inner_html(root),
        "<h1>Error</h1><p style=\"color: red;\">Cannot read &lt;config&gt;</p>"
    );
}

#[test]
fn fallback_replaces_previous_content() {
    let (mut doc, root) = mounted();
    append(&mut doc, root, "stale");
    append(&mut doc, root, "content");

    render_fallback(&mut doc, root, &RenderError::with_trace("bad", "frame 0"));
    assert_eq!(doc.children(root).len(), 1);
    assert_eq!(doc.text_content(root), "Errorbadframe 0");
}

#[test]
fn ad_hoc_component_without_body() {
    let (mut doc, root) = mounted();
    let app = App::new().mount_point(root);
    let banner = Component::new("Banner", |doc, _, _| {
        let node = h!(doc, "h2", None, "Welcome")?;
        Ok(node.into())
    });

    app.render_component(&mut doc, &banner, None).unwrap();
    assert_eq!(doc.inner_html(root), "<h2>Welcome</h2>");
}

#[test]
fn ad_hoc_component_conflicts_with_body() {
    let (mut doc, root) = mounted();
    let app = App::new().with_body(failing()).mount_point(root);
    let other = Component::new("Other", |_, _, _| Ok(Element::Empty));

    let err = app.render_component(&mut doc, &other, None).unwrap_err();
    assert!(matches!(err, RenderError::BodyConflict));
    assert!(doc.text_content(root).starts_with("Error"));
}

#[test]
fn missing_mount_point_is_not_attached() {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    doc.discard(root);

    let app = App::new().with_body(failing()).mount_point(root);
    assert!(matches!(app.render(&mut doc), Err(RenderError::NotAttached)));
}

#[test]
fn settle_runs_attach_hooks() {
    let (mut doc, root) = mounted();
    let body = Component::new("Focused", |doc, _, _| Ok(h!(doc, "div")?.into()))
        .on_attach(|doc, node| {
            let text = doc.create_text("!");
            doc.append_child(node, text);
        });
    let app = App::new()
        .with_body(body)
        .mount_point(root)
        .init_timeout(Duration::from_millis(50));

    app.render(&mut doc).unwrap();
    assert_eq!(app.settle(&mut doc), 1);
}
