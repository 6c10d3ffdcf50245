//! Tracks how many asynchronous operations are in flight.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tracing::trace;

use super::signal::{lock, signal, Publisher, Signal};

/// Wraps asynchronous operations and publishes whether any of them is
/// still running.
///
/// Clones share the same counter and signal.
#[derive(Clone)]
pub struct ActivityTracker {
    inner: Arc<Inner>,
}

struct Inner {
    // The counter lock is held while publishing so transitions go out in
    // the order they happened.
    count: Mutex<usize>,
    publisher: Publisher<bool>,
}

impl ActivityTracker {
    /// Creates an idle tracker; its signal starts at `false`.
    #[must_use]
    pub fn new() -> Self {
        let (publisher, _) = signal();
        publisher.publish(false);
        Self {
            inner: Arc::new(Inner {
                count: Mutex::new(0),
                publisher,
            }),
        }
    }

    /// `true` while at least one tracked operation runs. Only transitions
    /// are published.
    #[must_use]
    pub fn is_active(&self) -> Signal<bool> {
        self.inner.publisher.signal()
    }

    /// Number of tracked operations currently running.
    #[must_use]
    pub fn active_count(&self) -> usize {
        *lock(&self.inner.count)
    }

    /// Wraps `operation` so it counts as active from its first poll until it
    /// completes or is dropped.
    pub fn track<F>(&self, operation: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        let tracker = self.clone();
        async move {
            let _token = tracker.begin();
            operation.await
        }
    }

    fn begin(&self) -> ActivityToken {
        let mut count = lock(&self.inner.count);
        *count += 1;
        trace!(active = *count, "activity started");
        if *count == 1 {
            self.inner.publisher.publish(true);
        }
        ActivityToken {
            tracker: self.clone(),
        }
    }

    fn end(&self) {
        let mut count = lock(&self.inner.count);
        *count = count.saturating_sub(1);
        trace!(active = *count, "activity ended");
        if *count == 0 {
            self.inner.publisher.publish(false);
        }
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

struct ActivityToken {
    tracker: ActivityTracker,
}

impl Drop for ActivityToken {
    fn drop(&mut self) {
        self.tracker.end();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn starts_inactive() {
        let tracker = ActivityTracker::new();
        assert_eq!(tracker.is_active().latest(), Some(false));
        assert_eq!(tracker.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn active_while_operation_runs() {
        let tracker = ActivityTracker::new();
        let mut sub = tracker.is_active().subscribe();
        assert_eq!(sub.next().await, Some(false));

        let result = tracker
            .track(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err::<u32, &str>("boom")
            })
            .await;

        assert_eq!(result, Err("boom"));
        assert_eq!(sub.next().await, Some(true));
        assert_eq!(sub.next().await, Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_operations_publish_one_transition_each_way() {
        let tracker = ActivityTracker::new();
        let mut sub = tracker.is_active().subscribe();
        assert_eq!(sub.next().await, Some(false));

        let slow = tracker.track(tokio::time::sleep(Duration::from_millis(20)));
        let fast = tracker.track(tokio::time::sleep(Duration::from_millis(5)));
        let probe = {
            let tracker = tracker.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                tracker.active_count()
            }
        };
        let ((), (), during) = tokio::join!(slow, fast, probe);

        assert_eq!(during, 1);
        assert_eq!(tracker.active_count(), 0);
        assert_eq!(sub.next().await, Some(true));
        assert_eq!(sub.next().await, Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_operation_counts_as_finished() {
        let tracker = ActivityTracker::new();
        let never = tracker.track(std::future::pending::<()>());
        let outcome = tokio::time::timeout(Duration::from_millis(5), never).await;

        assert!(outcome.is_err());
        assert_eq!(tracker.active_count(), 0);
        assert_eq!(tracker.is_active().latest(), Some(false));
    }

    #[tokio::test]
    async fn concurrent_completions_balance_out() {
        let tracker = ActivityTracker::new();
        let mut handles = Vec::new();
        for _ in 0..32 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(async move {
                tracker.track(tokio::task::yield_now()).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(tracker.active_count(), 0);
        assert_eq!(tracker.is_active().latest(), Some(false));
    }
}
