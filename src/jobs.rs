// ============================================================================
// Host event loop: fired connection watchers and detached futures
// ============================================================================

use std::cell::Cell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::dom::observer::Watcher;
use crate::dom::NodeId;

/// Queue of watchers whose node has been connected, plus the local
/// executor that drives futures handed back by their callbacks.
pub(crate) struct JobQueue {
    pending: VecDeque<Watcher>,
    pool: LocalPool,
    /// Spawned futures that have not completed yet.
    live_tasks: Rc<Cell<usize>>,
}

impl JobQueue {
    pub(crate) fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            pool: LocalPool::new(),
            live_tasks: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn push_job(&mut self, watcher: Watcher) {
        self.pending.push_back(watcher);
    }

    /// Drain all pending jobs, oldest first.
    pub(crate) fn drain_pending_jobs(&mut self) -> Vec<Watcher> {
        self.pending.drain(..).collect()
    }

    pub(crate) fn has_pending_jobs(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Cancel and drop queued jobs whose node is in `nodes`.
    pub(crate) fn cancel_jobs_for(&mut self, nodes: &HashSet<NodeId>) {
        self.pending.retain(|watcher| {
            if nodes.contains(&watcher.handle.node()) {
                watcher.handle.cancel();
                false
            } else {
                true
            }
        });
    }

    /// Spawn a detached future. Nothing ever awaits it.
    pub(crate) fn spawn(&mut self, future: LocalBoxFuture<'static, ()>) {
        let live_tasks = self.live_tasks.clone();
        live_tasks.set(live_tasks.get() + 1);

        let counter = live_tasks.clone();
        let task = async move {
            future.await;
            counter.set(counter.get() - 1);
        };
        if let Err(e) = self.pool.spawner().spawn_local(task) {
            log::error!("Failed to spawn attach continuation: {:?}", e);
            live_tasks.set(live_tasks.get() - 1);
        }
    }

    pub(crate) fn live_tasks(&self) -> usize {
        self.live_tasks.get()
    }

    /// Poll spawned futures until none can make progress.
    pub(crate) fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }
}
