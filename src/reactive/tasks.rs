//! Registry of the background tasks that drive a dataflow graph.

use std::future::Future;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use tracing::Instrument;

use super::signal::lock;

/// Owns the join handles of every task spawned for one graph so they can
/// all be aborted together.
#[derive(Debug, Default)]
pub struct TaskSet {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskSet {
    /// Creates an empty task set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `fut` on the current tokio runtime inside `span`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F>(&self, span: tracing::Span, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(fut.instrument(span));
        let mut handles = lock(&self.handles);
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Number of tasks that have not finished yet.
    #[must_use]
    pub fn running(&self) -> usize {
        lock(&self.handles)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Aborts every task. Safe to call more than once.
    pub fn shutdown(&self) {
        for handle in lock(&self.handles).drain(..) {
            handle.abort();
        }
    }
}

impl Drop for TaskSet {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_pending_tasks() {
        let tasks = TaskSet::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tasks.spawn(tracing::Span::none(), async move {
            std::future::pending::<()>().await;
            let _ = tx.send(());
        });
        assert_eq!(tasks.running(), 1);

        tasks.shutdown();
        // The sender is dropped with the aborted task.
        assert!(rx.await.is_err());
        assert_eq!(tasks.running(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_tasks_are_not_counted() {
        let tasks = TaskSet::new();
        tasks.spawn(tracing::Span::none(), async {});
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(tasks.running(), 0);
    }
}
