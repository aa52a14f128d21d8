//! Components and their lifecycle hooks.
//!
//! A [`Component`] is a named render function plus two optional hooks:
//!
//! - `on_create` sees the rendered element before it is materialized and may
//!   replace it.
//! - `on_attach` runs once, on the host event loop, the first time the
//!   produced node is connected to the document. It may hand back a future
//!   that is spawned detached.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

use crate::dom::{Document, NodeId};
use crate::element::{Element, Props};
use crate::error::RenderError;

use super::materialize::materialize;

pub type RenderFn = dyn Fn(&mut Document, &Props, Vec<Element>) -> Result<Element, RenderError>;
pub type CreateHook = dyn Fn(&Element) -> Result<Option<Element>, RenderError>;
pub type AttachHook = dyn Fn(&mut Document, NodeId) -> Option<LocalBoxFuture<'static, ()>>;

#[derive(Clone)]
pub struct Component {
    name: Cow<'static, str>,
    render: Rc<RenderFn>,
    on_create: Option<Rc<CreateHook>>,
    on_attach: Option<Rc<AttachHook>>,
}

impl Component {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, render: F) -> Self
    where
        F: Fn(&mut Document, &Props, Vec<Element>) -> Result<Element, RenderError> + 'static,
    {
        Self {
            name: name.into(),
            render: Rc::new(render),
            on_create: None,
            on_attach: None,
        }
    }

    /// Hook run on the rendered element; returning `Some` replaces it.
    pub fn on_create<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Element) -> Result<Option<Element>, RenderError> + 'static,
    {
        self.on_create = Some(Rc::new(hook));
        self
    }

    /// Synchronous attach hook.
    pub fn on_attach<F>(self, hook: F) -> Self
    where
        F: Fn(&mut Document, NodeId) + 'static,
    {
        self.on_attach_with(move |doc, node| {
            hook(doc, node);
            None
        })
    }

    /// Attach hook whose work continues in a detached future.
    pub fn on_attach_async<F, Fut>(self, hook: F) -> Self
    where
        F: Fn(&mut Document, NodeId) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        self.on_attach_with(move |doc, node| Some(hook(doc, node).boxed_local()))
    }

    /// Attach hook with an optional async continuation.
    pub fn on_attach_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Document, NodeId) -> Option<LocalBoxFuture<'static, ()>> + 'static,
    {
        self.on_attach = Some(Rc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_on_create(&self) -> bool {
        self.on_create.is_some()
    }

    pub fn has_on_attach(&self) -> bool {
        self.on_attach.is_some()
    }

    /// Run only the render function.
    pub fn render(
        &self,
        doc: &mut Document,
        props: &Props,
        children: Vec<Element>,
    ) -> Result<Element, RenderError> {
        (self.render)(doc, props, children)
    }

    /// Whether both handles share the same render function.
    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("on_create", &self.on_create.is_some())
            .field("on_attach", &self.on_attach.is_some())
            .finish()
    }
}

/// Render `component` into a node.
///
/// Errors from the render function or `on_create` propagate. When the
/// component has an attach hook, a one-shot connection watcher is
/// registered on the returned node.
pub fn invoke_component(
    doc: &mut Document,
    component: &Component,
    props: Option<Props>,
    children: Vec<Element>,
) -> Result<NodeId, RenderError> {
    log::trace!("Rendering component {}", component.name);
    let props = props.unwrap_or_default();
    let mut element = component.render(doc, &props, children)?;

    if let Some(on_create) = &component.on_create {
        if let Some(replacement) = on_create(&element)? {
            element = replacement;
        }
    }

    let node = materialize(doc, element);

    if let Some(on_attach) = &component.on_attach {
        let on_attach = on_attach.clone();
        let name = component.name.clone();
        doc.observe_connection(node, move |doc, node| {
            log::debug!("Component {} attached", name);
            on_attach(doc, node)
        });
    }

    Ok(node)
}
