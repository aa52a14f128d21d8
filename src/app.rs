//! Application lifecycle: configuration, mount point and the top-level
//! render with its error fallback.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::dom::{Document, NodeId};
use crate::element::{Element, Props};
use crate::error::RenderError;
use crate::render::{attach, build_intrinsic, create, Component};

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Debug)]
pub struct AppSettings {
    /// Upper bound for [`App::settle`].
    pub init_timeout: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            init_timeout: Duration::from_secs(10),
        }
    }
}

/// Supplies default props for every top-level render.
pub type PropsProvider<C> = Box<dyn Fn(&App<C>) -> Props>;

/// An application bound to a mount point.
///
/// The configuration is frozen at [`App::init`] and only readable afterwards.
///
/// # Example
/// ```ignore
/// let mut doc = Document::new();
/// let root = doc.create_element("div");
/// let app = App::new().with_body(greeting()).mount_point(root);
/// app.render(&mut doc)?;
/// ```
pub struct App<C = ()> {
    config: Rc<C>,
    settings: AppSettings,
    mount: Option<NodeId>,
    body: Option<Component>,
    init_props: Option<PropsProvider<C>>,
    /// Node attached by the last render; discarded once replaced.
    attached: Cell<Option<NodeId>>,
}

impl App<()> {
    pub fn new() -> Self {
        Self::init(())
    }
}

impl Default for App<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> App<C> {
    pub fn init(config: C) -> Self {
        // Another logger may already be installed by the host.
        let _ = env_logger::try_init();

        Self {
            config: Rc::new(config),
            settings: AppSettings::default(),
            mount: None,
            body: None,
            init_props: None,
            attached: Cell::new(None),
        }
    }

    pub fn with_body(mut self, body: Component) -> Self {
        self.body = Some(body);
        self
    }

    pub fn mount_point(mut self, root: NodeId) -> Self {
        self.mount = Some(root);
        self
    }

    pub fn settings(mut self, settings: AppSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn init_timeout(mut self, timeout: Duration) -> Self {
        self.settings.init_timeout = timeout;
        self
    }

    /// Default props for top-level renders; call-site props win on conflict.
    pub fn init_props<F>(mut self, provider: F) -> Self
    where
        F: Fn(&App<C>) -> Props + 'static,
    {
        self.init_props = Some(Box::new(provider));
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn shared_config(&self) -> Rc<C> {
        self.config.clone()
    }

    pub fn app_settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn mount(&self) -> Option<NodeId> {
        self.mount
    }

    pub fn body(&self) -> Option<&Component> {
        self.body.as_ref()
    }

    /// The node the last render attached under the mount point.
    pub fn attached(&self) -> Option<NodeId> {
        self.attached.get()
    }

    /// Render the configured body under the mount point.
    pub fn render(&self, doc: &mut Document) -> Result<NodeId, RenderError> {
        self.render_with(doc, None)
    }

    /// Render the configured body with call-site props.
    pub fn render_with(
        &self,
        doc: &mut Document,
        props: Option<Props>,
    ) -> Result<NodeId, RenderError> {
        let body = self.body.clone().ok_or(RenderError::MissingBody);
        self.render_root(doc, body, props)
    }

    /// Render an ad-hoc component. Only allowed when no body is configured.
    pub fn render_component(
        &self,
        doc: &mut Document,
        component: &Component,
        props: Option<Props>,
    ) -> Result<NodeId, RenderError> {
        let component = match self.body {
            Some(_) => Err(RenderError::BodyConflict),
            None => Ok(component.clone()),
        };
        self.render_root(doc, component, props)
    }

    fn render_root(
        &self,
        doc: &mut Document,
        component: Result<Component, RenderError>,
        props: Option<Props>,
    ) -> Result<NodeId, RenderError> {
        let Some(root) = self.mount.filter(|&root| doc.contains(root)) else {
            log::error!("Render requested without a mount point");
            return Err(RenderError::NotAttached);
        };

        let result = component.and_then(|component| {
            log::debug!("Rendering {} into {:?}", component.name(), root);
            let props = self.resolve_props(props);
            let node = create(doc, &component, props, Vec::new())?;
            Ok(attach(doc, root, node))
        });

        let (node, result) = match result {
            Ok(node) => (node, Ok(node)),
            Err(err) => {
                log::error!("Render failed: {}", err);
                (render_fallback(doc, root, &err), Err(err))
            }
        };
        self.release_previous(doc, node);
        result
    }

    /// Discard the tree attached by the previous render, along with its
    /// connection watchers, unless the new tree still uses part of it.
    fn release_previous(&self, doc: &mut Document, current: NodeId) {
        let Some(previous) = self.attached.replace(Some(current)) else {
            return;
        };
        if !doc.contains(previous)
            || doc.is_inclusive_ancestor(previous, current)
            || doc.is_inclusive_ancestor(current, previous)
        {
            return;
        }
        log::trace!("Releasing previous tree {:?}", previous);
        doc.discard(previous);
    }

    fn resolve_props(&self, props: Option<Props>) -> Option<Props> {
        let defaults = self.init_props.as_ref().map(|provider| provider(self));
        match (defaults, props) {
            (Some(defaults), Some(props)) => Some(Props::merge(defaults, props)),
            (defaults, props) => defaults.or(props),
        }
    }

    /// Flush the document until no connection callbacks are queued and
    /// every future they returned has completed, or until `init_timeout`
    /// elapses. Returns the number of callbacks run.
    pub fn settle(&self, doc: &mut Document) -> usize {
        let started = Instant::now();
        let mut fired = 0;
        loop {
            fired += doc.flush();
            if doc.is_idle() {
                break;
            }
            if started.elapsed() >= self.settings.init_timeout {
                log::warn!(
                    "{} task(s) still pending after {:?}",
                    doc.pending_tasks(),
                    self.settings.init_timeout
                );
                break;
            }
            std::thread::sleep(SETTLE_POLL_INTERVAL);
        }
        fired
    }
}

/// Replace the content of `root` with an error view: a heading, the message
/// in red and the trace, when the error has one.
pub fn render_fallback(doc: &mut Document, root: NodeId, err: &RenderError) -> NodeId {
    let heading = build_intrinsic(doc, "h1", None, vec![Element::from("Error")]);
    let message = build_intrinsic(
        doc,
        "p",
        Some(Props::new().style("color: red;")),
        vec![Element::from(err.to_string())],
    );

    let mut view = vec![Element::Node(heading), Element::Node(message)];
    if let Some(trace) = err.trace() {
        let pre = build_intrinsic(doc, "pre", None, vec![Element::from(trace)]);
        view.push(Element::Node(pre));
    }
    attach(doc, root, Element::Fragment(view))
}
