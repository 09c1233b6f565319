//! Observable state cells fed by asynchronous repository calls.
//!
//! # Design
//! A `StatePublisher<T>` wraps a `tokio::sync::watch` channel: one writer,
//! any number of readers, readers always see the latest value. Fetches are
//! spawned onto a `TaskScope`, which is owned by the presentation component
//! and cancels every in-flight task when it is cancelled or dropped.
//!
//! Failures are logged and swallowed: the cell keeps its last good value and
//! no loading or error state is ever published. Overlapping loads are not
//! sequenced; whichever settles last wins.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::error;

use crate::repository::RepoResult;

/// Lifecycle-bound set of background tasks.
#[derive(Debug, Default)]
pub struct TaskScope {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` on the current runtime. If the scope is cancelled first,
    /// `task` is dropped at its next suspension point.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = task => {}
            }
        });
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once every task spawned so far has settled or been cancelled.
    pub async fn idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Single-slot observable holding the last successfully loaded value.
#[derive(Debug)]
pub struct StatePublisher<T> {
    tag: &'static str,
    cell: Arc<watch::Sender<T>>,
}

impl<T> Clone for StatePublisher<T> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> StatePublisher<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `tag` identifies the owning component in failure logs.
    pub fn new(tag: &'static str, initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            tag,
            cell: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.cell.subscribe()
    }

    pub fn current(&self) -> T {
        self.cell.borrow().clone()
    }

    /// Replaces the value wholesale. Receivers are notified even if none
    /// existed when the cell was created.
    pub fn publish(&self, value: T) {
        self.cell.send_replace(value);
    }

    /// Applies one fetch outcome: success overwrites, failure logs and leaves
    /// the cell untouched.
    pub fn settle(&self, outcome: RepoResult<T>) {
        match outcome {
            Ok(value) => self.publish(value),
            Err(err) => {
                error!(
                    target: "momentum::state",
                    tag = self.tag,
                    kind = ?err.kind,
                    "failed to load data: {}",
                    err.message
                );
            }
        }
    }

    /// Starts `fetch` on `scope` and settles the cell with its outcome.
    pub fn load<F>(&self, scope: &TaskScope, fetch: F)
    where
        F: Future<Output = RepoResult<T>> + Send + 'static,
    {
        let cell = self.clone();
        scope.spawn(async move {
            let outcome = fetch.await;
            cell.settle(outcome);
        });
    }
}
