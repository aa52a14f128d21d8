//! Arena-based node storage.
//!
//! Nodes live in a slot vector addressed by generational [`NodeId`]s: a
//! discarded node's slot is reused with a bumped generation, so stale ids
//! never alias a newer node.
//!
//! The document owns a `body` element that is always connected. A node is
//! connected iff its parent chain reaches `body`; every mutation that can
//! connect a node re-checks the pending connection watchers.

use std::collections::HashSet;
use std::fmt;

use futures::future::LocalBoxFuture;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::jobs::JobQueue;

use super::node::{ElementData, Event, NodeKind};
use super::observer::{ConnectionWatch, WatchState, Watcher};

/// Unique identifier for a node in a [`Document`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Combine generation (high bits) and index (low bits).
    pub fn as_u64(self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.index)
    }
}

struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Slot {
    generation: u32,
    node: Option<NodeData>,
}

pub struct Document {
    slots: Vec<Slot>,
    free_indices: Vec<u32>,
    body: NodeId,
    /// Watchers whose node has not been connected yet.
    watchers: Vec<Watcher>,
    jobs: JobQueue,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free_indices: Vec::new(),
            body: NodeId::new(0, 0),
            watchers: Vec::new(),
            jobs: JobQueue::new(),
            diagnostics: Vec::new(),
        };
        doc.body = doc.allocate(NodeKind::Element(ElementData::new("body")));
        doc
    }

    fn allocate(&mut self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        };

        if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(data);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(data),
            });
            NodeId::new(index, 0)
        }
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// The always-connected root of the document.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.allocate(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.allocate(NodeKind::Text(text.into()))
    }

    pub fn create_container(&mut self) -> NodeId {
        self.allocate(NodeKind::Container)
    }

    /// Whether `id` refers to a live node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, `body` included.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id)? {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether the node is part of the live tree under `body`.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.body, id)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(_) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// Check that `child` may be inserted under `parent`.
    fn check_insert(&mut self, parent: NodeId, child: NodeId) -> bool {
        let problem = if !self.contains(parent) || !self.contains(child) {
            Some("node does not belong to this document")
        } else if matches!(self.kind(parent), Some(NodeKind::Text(_))) {
            Some("text nodes cannot have children")
        } else if child == self.body {
            Some("the document body cannot be moved")
        } else if self.is_inclusive_ancestor(child, parent) {
            Some("a node cannot be inserted into itself or its descendants")
        } else {
            None
        };

        match problem {
            Some(message) => {
                self.report(Diagnostic::new(DiagnosticKind::HierarchyRequest, message));
                false
            }
            None => true,
        }
    }

    /// Remove `child` from its current parent, if any.
    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&c| c != child);
        }
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = None;
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.unlink(child);
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
        }
    }

    /// Append `child` as the last child of `parent`, moving it from its
    /// previous parent. Returns `false` (with a diagnostic) when the
    /// hierarchy would be invalid.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.check_insert(parent, child) {
            return false;
        }
        self.link(parent, child);
        self.notify_connections();
        true
    }

    /// Replace all children of `parent` with `children`, in order.
    ///
    /// Previous children are detached but stay in the document until
    /// [`discard`](Self::discard)ed. Invalid entries are skipped with a
    /// diagnostic; when every entry is invalid, `parent` is left unchanged.
    pub fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) {
        if !self.contains(parent) {
            self.report(Diagnostic::new(
                DiagnosticKind::HierarchyRequest,
                "node does not belong to this document",
            ));
            return;
        }

        let accepted: Vec<NodeId> = children
            .iter()
            .copied()
            .filter(|&child| self.check_insert(parent, child))
            .collect();
        if accepted.is_empty() && !children.is_empty() {
            return;
        }

        let previous = match self.node_mut(parent) {
            Some(node) => std::mem::take(&mut node.children),
            None => Vec::new(),
        };
        for old in previous {
            if let Some(node) = self.node_mut(old) {
                node.parent = None;
            }
        }

        for child in accepted {
            self.link(parent, child);
        }
        self.notify_connections();
    }

    /// Detach a node from its parent, keeping it (and its subtree) alive.
    pub fn detach(&mut self, node: NodeId) {
        self.unlink(node);
    }

    /// Remove a node and its whole subtree from the document.
    ///
    /// Every connection watcher on a removed node is cancelled.
    pub fn discard(&mut self, node: NodeId) {
        if node == self.body {
            self.report(Diagnostic::new(
                DiagnosticKind::HierarchyRequest,
                "the document body cannot be discarded",
            ));
            return;
        }
        if !self.contains(node) {
            return;
        }

        self.unlink(node);

        let mut removed = HashSet::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            stack.extend_from_slice(self.children(id));
            if let Some(slot) = self.slots.get_mut(id.index as usize) {
                slot.node = None;
            }
            self.free_indices.push(id.index);
            removed.insert(id);
        }

        self.watchers.retain(|watcher| {
            if removed.contains(&watcher.handle.node()) {
                watcher.handle.cancel();
                false
            } else {
                true
            }
        });
        self.jobs.cancel_jobs_for(&removed);
        log::trace!("Discarded {} node(s)", removed.len());
    }

    /// Invoke the `on{kind}` handler of an element, if one is registered.
    pub fn dispatch_event(&self, node: NodeId, kind: &str) -> bool {
        let property = format!("on{kind}");
        let Some(handler) = self
            .element(node)
            .and_then(|el| el.handler(&property))
            .cloned()
        else {
            return false;
        };

        handler(&Event {
            kind: kind.to_string(),
            target: node,
        });
        true
    }

    /// Watch `node` until it is connected, then run `callback` once on the
    /// next [`flush`](Self::flush).
    ///
    /// A node that is already connected is queued immediately.
    pub fn observe_connection(
        &mut self,
        node: NodeId,
        callback: impl FnOnce(&mut Document, NodeId) -> Option<LocalBoxFuture<'static, ()>> + 'static,
    ) -> ConnectionWatch {
        let handle = ConnectionWatch::new(node);
        if !self.contains(node) {
            self.report(Diagnostic::new(
                DiagnosticKind::UnrecognizedElement,
                "cannot observe a node that does not belong to this document",
            ));
            handle.cancel();
            return handle;
        }

        let watcher = Watcher {
            handle: handle.clone(),
            callback: Box::new(callback),
        };
        if self.is_connected(node) {
            handle.set_state(WatchState::Queued);
            self.jobs.push_job(watcher);
        } else {
            self.watchers.push(watcher);
        }
        handle
    }

    /// Move watchers whose node just became connected to the job queue.
    fn notify_connections(&mut self) {
        if self.watchers.is_empty() {
            return;
        }

        for watcher in std::mem::take(&mut self.watchers) {
            let node = watcher.handle.node();
            if watcher.handle.state() != WatchState::Pending {
                continue;
            }
            if !self.contains(node) {
                watcher.handle.cancel();
                continue;
            }

            if self.is_connected(node) {
                log::trace!("Node {:?} connected, queueing watcher", node);
                watcher.handle.set_state(WatchState::Queued);
                self.jobs.push_job(watcher);
            } else {
                self.watchers.push(watcher);
            }
        }
    }

    /// Number of watchers still waiting for their node to connect.
    pub fn pending_watchers(&self) -> usize {
        self.watchers
            .iter()
            .filter(|w| w.handle.state() == WatchState::Pending)
            .count()
    }

    pub fn has_pending_jobs(&self) -> bool {
        self.jobs.has_pending_jobs()
    }

    /// Number of futures returned by connection callbacks that have not
    /// completed yet.
    pub fn pending_tasks(&self) -> usize {
        self.jobs.live_tasks()
    }

    /// No queued callbacks and no unfinished futures.
    pub fn is_idle(&self) -> bool {
        !self.has_pending_jobs() && self.pending_tasks() == 0
    }

    /// Run one host event loop tick.
    ///
    /// Runs every queued connection callback (including ones queued by
    /// callbacks during this tick), spawns the futures they return and
    /// drives those futures until they stall. Returns the number of
    /// callbacks that ran.
    pub fn flush(&mut self) -> usize {
        let mut fired = 0;
        loop {
            let jobs = self.jobs.drain_pending_jobs();
            if jobs.is_empty() {
                break;
            }

            for Watcher { handle, callback } in jobs {
                if handle.state() != WatchState::Queued {
                    continue;
                }
                let node = handle.node();
                if !self.contains(node) {
                    handle.cancel();
                    continue;
                }

                handle.set_state(WatchState::Fired);
                fired += 1;
                if let Some(future) = callback(self, node) {
                    self.jobs.spawn(future);
                }
            }
        }
        self.jobs.run_until_stalled();
        fired
    }

    /// Record and log a non-fatal diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.node_count())
            .field("body", &self.body)
            .field("pending_watchers", &self.pending_watchers())
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn counting_watch(doc: &mut Document, node: NodeId) -> (ConnectionWatch, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let watch = doc.observe_connection(node, move |_, _| {
            counter.set(counter.get() + 1);
            None
        });
        (watch, count)
    }

    #[test]
    fn test_generational_index() {
        let mut doc = Document::new();
        let id1 = doc.create_container();
        doc.discard(id1);

        let id2 = doc.create_container();
        assert!(!doc.contains(id1));
        assert!(doc.contains(id2));
        assert_eq!(id1.index, id2.index);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn test_parent_child() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let child = doc.create_text("hi");

        assert!(doc.append_child(parent, child));
        assert_eq!(doc.parent(child), Some(parent));
        assert_eq!(doc.children(parent), &[child]);
        assert_eq!(doc.text_content(parent), "hi");
    }

    #[test]
    fn test_append_moves_between_parents() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");

        doc.append_child(a, child);
        doc.append_child(b, child);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[child]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);

        assert!(!doc.append_child(inner, outer));
        assert!(!doc.append_child(outer, outer));
        assert_eq!(doc.parent(outer), None);
        assert_eq!(doc.diagnostics().len(), 2);
        assert!(doc
            .diagnostics()
            .iter()
            .all(|d| d.kind == DiagnosticKind::HierarchyRequest));
    }

    #[test]
    fn test_replace_children_detaches_previous() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let old = doc.create_text("old");
        let new = doc.create_text("new");
        doc.append_child(root, old);

        doc.replace_children(root, &[new]);
        assert_eq!(doc.children(root), &[new]);
        assert_eq!(doc.parent(old), None);
        assert!(doc.contains(old));
    }

    #[test]
    fn test_replace_children_with_only_invalid_keeps_previous() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let old = doc.create_text("old");
        doc.append_child(root, old);

        let body = doc.body();
        doc.replace_children(root, &[body]);
        assert_eq!(doc.children(root), &[old]);
        assert_eq!(doc.parent(old), Some(root));
        assert_eq!(doc.diagnostics().len(), 1);

        doc.replace_children(root, &[]);
        assert!(doc.children(root).is_empty());
    }

    #[test]
    fn test_is_connected() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(root, child);
        assert!(!doc.is_connected(child));

        let body = doc.body();
        doc.append_child(body, root);
        assert!(doc.is_connected(child));
        assert!(doc.is_connected(body));
    }

    #[test]
    fn test_watcher_fires_once_on_flush() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        let (watch, count) = counting_watch(&mut doc, node);

        assert_eq!(doc.flush(), 0);
        let body = doc.body();
        doc.append_child(body, node);
        assert_eq!(watch.state(), WatchState::Queued);
        assert_eq!(count.get(), 0);

        assert_eq!(doc.flush(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(watch.state(), WatchState::Fired);

        doc.detach(node);
        doc.append_child(body, node);
        doc.flush();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_watcher_on_connected_node_fires_next_flush() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        let body = doc.body();
        doc.append_child(body, node);

        let (_watch, count) = counting_watch(&mut doc, node);
        assert!(doc.has_pending_jobs());
        doc.flush();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cancelled_watcher_never_fires() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        let (watch, count) = counting_watch(&mut doc, node);
        watch.cancel();

        let body = doc.body();
        doc.append_child(body, node);
        doc.flush();
        assert_eq!(count.get(), 0);
        assert_eq!(doc.pending_watchers(), 0);
    }

    #[test]
    fn test_discard_cancels_watchers_in_subtree() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(root, child);
        let (watch, count) = counting_watch(&mut doc, child);

        doc.discard(root);
        assert!(!doc.contains(root));
        assert!(!doc.contains(child));
        assert_eq!(watch.state(), WatchState::Cancelled);
        assert_eq!(doc.pending_watchers(), 0);
        doc.flush();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_discard_cancels_queued_watchers() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        let (watch, count) = counting_watch(&mut doc, node);
        let body = doc.body();
        doc.append_child(body, node);
        assert_eq!(watch.state(), WatchState::Queued);

        doc.discard(node);
        doc.flush();
        assert_eq!(count.get(), 0);
        assert_eq!(watch.state(), WatchState::Cancelled);
    }

    #[test]
    fn test_future_from_callback_runs_during_flush() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        doc.observe_connection(node, move |_, _| {
            Some(Box::pin(async move {
                futures::future::ready(()).await;
                flag.set(true);
            }))
        });

        let body = doc.body();
        doc.append_child(body, node);
        assert!(!doc.is_idle());
        doc.flush();
        assert!(done.get());
        assert_eq!(doc.pending_tasks(), 0);
        assert!(doc.is_idle());
    }

    #[test]
    fn test_unfinished_future_keeps_document_busy() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.observe_connection(node, |_, _| Some(Box::pin(futures::future::pending::<()>())));

        let body = doc.body();
        doc.append_child(body, node);
        assert_eq!(doc.flush(), 1);
        assert!(!doc.has_pending_jobs());
        assert_eq!(doc.pending_tasks(), 1);
        assert!(!doc.is_idle());
    }

    #[test]
    fn test_body_cannot_be_discarded() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.discard(body);
        assert!(doc.contains(body));
        assert_eq!(doc.diagnostics().len(), 1);
    }

    #[test]
    fn test_dispatch_event_calls_handler() {
        use crate::element::PropValue;

        let mut doc = Document::new();
        let button = doc.create_element("button");
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        if let Some(el) = doc.element_mut(button) {
            el.set_property(
                "onclick",
                PropValue::handler(move |event| {
                    assert_eq!(event.kind, "click");
                    counter.set(counter.get() + 1);
                }),
            );
        }

        assert!(doc.dispatch_event(button, "click"));
        assert!(!doc.dispatch_event(button, "focus"));
        assert_eq!(clicks.get(), 1);
    }
}
