//! Multicast channel that replays its latest value to new subscribers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::channel::mpsc;
use futures::stream::{self, BoxStream, StreamExt};

/// Bounds every value carried by a [`Signal`] must meet.
pub trait SignalValue: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> SignalValue for T {}

struct Shared<T> {
    state: Mutex<State<T>>,
}

struct State<T> {
    latest: Option<T>,
    // One unbounded queue per subscriber, so a slow reader never loses values.
    subscribers: Vec<mpsc::UnboundedSender<T>>,
    closed: bool,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Creates a connected publisher/signal pair with no value yet.
#[must_use]
pub fn signal<T: SignalValue>() -> (Publisher<T>, Signal<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            latest: None,
            subscribers: Vec::new(),
            closed: false,
        }),
    });
    (
        Publisher {
            shared: Arc::clone(&shared),
        },
        Signal { shared },
    )
}

/// Write side of a signal. Dropping it ends every subscription once the
/// queued values are drained.
pub struct Publisher<T> {
    shared: Arc<Shared<T>>,
}

impl<T: SignalValue> Publisher<T> {
    /// Stores `value` as the latest value and delivers it to every current
    /// subscriber. Subscriptions that were dropped are pruned here.
    pub fn publish(&self, value: T) {
        let mut state = lock(&self.shared.state);
        state
            .subscribers
            .retain(|tx| tx.unbounded_send(value.clone()).is_ok());
        state.latest = Some(value);
    }

    /// A read handle onto this publisher's values.
    #[must_use]
    pub fn signal(&self) -> Signal<T> {
        Signal {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Drop for Publisher<T> {
    fn drop(&mut self) {
        let mut state = lock(&self.shared.state);
        state.closed = true;
        state.subscribers.clear();
    }
}

/// Read side of a multicast channel.
///
/// Every subscriber shares the one upstream computation and is handed the
/// latest value as soon as it subscribes.
pub struct Signal<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: SignalValue> Signal<T> {
    /// Subscribes to the signal.
    ///
    /// The latest value (if any) is delivered first, followed by every value
    /// published afterwards. Taking the replay value and joining the channel
    /// happen under one lock, so nothing is missed or seen twice.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        let mut state = lock(&self.shared.state);
        let rx = if state.closed {
            None
        } else {
            let (tx, rx) = mpsc::unbounded();
            state.subscribers.push(tx);
            Some(rx)
        };
        Subscription {
            replay: state.latest.clone(),
            rx,
        }
    }

    /// The most recently published value.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        lock(&self.shared.state).latest.clone()
    }

    /// True once the publisher has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        lock(&self.shared.state).closed
    }
}

/// One observer's view of a [`Signal`].
pub struct Subscription<T> {
    replay: Option<T>,
    rx: Option<mpsc::UnboundedReceiver<T>>,
}

impl<T: SignalValue> Subscription<T> {
    /// Waits for the next value. Returns `None` once the publisher is gone
    /// and everything published before that has been received.
    ///
    /// Cancel safe: dropping the future loses no value.
    pub async fn next(&mut self) -> Option<T> {
        if let Some(value) = self.replay.take() {
            return Some(value);
        }
        let rx = self.rx.as_mut()?;
        let value = rx.next().await;
        if value.is_none() {
            self.rx = None;
        }
        value
    }

    /// Converts the subscription into a boxed [`futures::Stream`].
    #[must_use]
    pub fn into_stream(self) -> BoxStream<'static, T> {
        stream::unfold(self, |mut sub| async move {
            let value = sub.next().await?;
            Some((value, sub))
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_sees_values_in_order() {
        let (publisher, signal) = signal::<u32>();
        let mut sub = signal.subscribe();
        publisher.publish(1);
        publisher.publish(2);
        assert_eq!(sub.next().await, Some(1));
        assert_eq!(sub.next().await, Some(2));
    }

    #[tokio::test]
    async fn late_subscriber_gets_latest_only() {
        let (publisher, signal) = signal::<&'static str>();
        publisher.publish("first");
        publisher.publish("second");

        let mut sub = signal.subscribe();
        assert_eq!(sub.next().await, Some("second"));

        publisher.publish("third");
        assert_eq!(sub.next().await, Some("third"));
    }

    #[tokio::test]
    async fn all_subscribers_share_each_value() {
        let (publisher, signal) = signal::<u32>();
        let mut a = signal.subscribe();
        let mut b = signal.subscribe();
        publisher.publish(7);
        assert_eq!(a.next().await, Some(7));
        assert_eq!(b.next().await, Some(7));
    }

    #[tokio::test]
    async fn dropping_publisher_ends_subscriptions_after_drain() {
        let (publisher, signal) = signal::<u32>();
        let mut sub = signal.subscribe();
        publisher.publish(1);
        drop(publisher);

        assert!(signal.is_closed());
        assert_eq!(sub.next().await, Some(1));
        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn subscribing_after_close_still_replays() {
        let (publisher, signal) = signal::<u32>();
        publisher.publish(3);
        drop(publisher);

        let mut sub = signal.subscribe();
        assert_eq!(sub.next().await, Some(3));
        assert_eq!(sub.next().await, None);
        assert_eq!(signal.latest(), Some(3));
    }

    #[tokio::test]
    async fn slow_subscriber_receives_every_value() {
        let (publisher, signal) = signal::<usize>();
        let mut sub = signal.subscribe();
        for i in 0..500 {
            publisher.publish(i);
        }
        drop(publisher);
        let mut seen = Vec::new();
        while let Some(value) = sub.next().await {
            seen.push(value);
        }
        assert_eq!(seen, (0..500).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn dropped_subscriptions_are_pruned() {
        let (publisher, signal) = signal::<u32>();
        let kept = signal.subscribe();
        drop(signal.subscribe());
        publisher.publish(1);
        assert_eq!(lock(&publisher.shared.state).subscribers.len(), 1);
        drop(kept);
    }

    #[tokio::test]
    async fn into_stream_yields_until_closed() {
        let (publisher, signal) = signal::<u32>();
        let stream = signal.subscribe().into_stream();
        publisher.publish(1);
        publisher.publish(2);
        drop(publisher);
        let values: Vec<u32> = stream.collect().await;
        assert_eq!(values, vec![1, 2]);
    }
}
