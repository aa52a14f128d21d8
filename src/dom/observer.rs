//! One-shot connection watchers.
//!
//! A watcher waits for a node to become connected (reachable from the
//! document `body`). The first time that happens the watcher is queued on
//! the host event loop; [`Document::flush`](super::Document::flush) runs it
//! and it never fires again. The [`ConnectionWatch`] handle shares the
//! watcher's state so it can be cancelled without access to the document.

use std::cell::Cell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::{Document, NodeId};

/// Callback run when a watched node is connected. It may hand back a
/// future, which is spawned detached on the document's executor.
pub type ConnectCallback =
    Box<dyn FnOnce(&mut Document, NodeId) -> Option<LocalBoxFuture<'static, ()>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchState {
    /// Waiting for the node to be connected.
    Pending,
    /// Connection observed; waiting for the next flush.
    Queued,
    /// Callback has run.
    Fired,
    Cancelled,
}

/// Subscription handle for a connection watcher.
///
/// Dropping the handle does not cancel the watcher.
#[derive(Clone, Debug)]
pub struct ConnectionWatch {
    node: NodeId,
    state: Rc<Cell<WatchState>>,
}

impl ConnectionWatch {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node,
            state: Rc::new(Cell::new(WatchState::Pending)),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> WatchState {
        self.state.get()
    }

    /// Whether the callback may still run.
    pub fn is_active(&self) -> bool {
        matches!(self.state(), WatchState::Pending | WatchState::Queued)
    }

    /// Stop watching. Idempotent; has no effect once the callback has run.
    pub fn cancel(&self) {
        if self.is_active() {
            self.state.set(WatchState::Cancelled);
        }
    }

    pub(crate) fn set_state(&self, state: WatchState) {
        self.state.set(state);
    }
}

pub(crate) struct Watcher {
    pub(crate) handle: ConnectionWatch,
    pub(crate) callback: ConnectCallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let mut doc = Document::new();
        let node = doc.create_container();
        let watch = ConnectionWatch::new(node);
        assert!(watch.is_active());

        watch.cancel();
        watch.cancel();
        assert_eq!(watch.state(), WatchState::Cancelled);
    }

    #[test]
    fn test_cancel_after_fire_keeps_fired() {
        let mut doc = Document::new();
        let node = doc.create_container();
        let watch = ConnectionWatch::new(node);
        watch.set_state(WatchState::Fired);
        watch.cancel();
        assert_eq!(watch.state(), WatchState::Fired);
    }

    #[test]
    fn test_clones_share_state() {
        let mut doc = Document::new();
        let node = doc.create_container();
        let watch = ConnectionWatch::new(node);
        let other = watch.clone();
        other.cancel();
        assert!(!watch.is_active());
    }
}
