//! Dataflow graph: operators that derive new signals from existing ones.
//!
//! Each operator spawns one task that owns its input subscriptions and its
//! output publisher, so the state an operator keeps (last seen values, the
//! current inner stream) is never touched from anywhere else. Dropping the
//! [`Graph`] aborts all of them.

use std::task::Poll;

use futures::stream::{BoxStream, Stream, StreamExt};
use tracing::{debug, trace};

use super::signal::{signal, Signal, SignalValue};
use super::tasks::TaskSet;

/// Builder and owner of a set of connected signals.
pub struct Graph {
    span: tracing::Span,
    tasks: TaskSet,
}

impl Graph {
    /// Creates an empty graph whose tasks run inside `span`.
    #[must_use]
    pub fn new(span: tracing::Span) -> Self {
        Self {
            span,
            tasks: TaskSet::new(),
        }
    }

    /// Number of operator tasks still running.
    #[must_use]
    pub fn running_tasks(&self) -> usize {
        self.tasks.running()
    }

    /// Aborts every operator task. Subscribers of the graph's signals see
    /// the end of their streams.
    pub fn shutdown(&self) {
        self.tasks.shutdown();
    }

    /// Publishes every item of an external stream as a shared signal.
    pub fn source<S>(&self, name: &'static str, mut stream: S) -> Signal<S::Item>
    where
        S: Stream + Unpin + Send + 'static,
        S::Item: SignalValue,
    {
        let (publisher, output) = signal();
        self.tasks.spawn(self.span.clone(), async move {
            while let Some(value) = stream.next().await {
                trace!(node = name, "input");
                publisher.publish(value);
            }
            debug!(node = name, "input ended");
        });
        output
    }

    /// Applies `f` to every value of `source`.
    pub fn map<T, U, F>(&self, name: &'static str, source: &Signal<T>, mut f: F) -> Signal<U>
    where
        T: SignalValue,
        U: SignalValue,
        F: FnMut(T) -> U + Send + 'static,
    {
        let (publisher, output) = signal();
        let mut upstream = source.subscribe();
        self.tasks.spawn(self.span.clone(), async move {
            while let Some(value) = upstream.next().await {
                trace!(node = name, "emit");
                publisher.publish(f(value));
            }
        });
        output
    }

    /// Drops values equal to the one emitted just before them.
    pub fn distinct_until_changed<T>(&self, name: &'static str, source: &Signal<T>) -> Signal<T>
    where
        T: SignalValue + PartialEq,
    {
        let (publisher, output) = signal();
        let mut upstream = source.subscribe();
        self.tasks.spawn(self.span.clone(), async move {
            let mut last: Option<T> = None;
            while let Some(value) = upstream.next().await {
                if last.as_ref() == Some(&value) {
                    continue;
                }
                trace!(node = name, "emit");
                last = Some(value.clone());
                publisher.publish(value);
            }
        });
        output
    }

    /// Latest-wins flattening.
    ///
    /// Each value of `source` is turned into an inner stream by `f`, and the
    /// output forwards items of the most recent inner stream only. When a new
    /// upstream value arrives the previous inner stream is dropped, so a late
    /// result for a stale value can never be observed. At most one inner
    /// stream is alive at a time.
    pub fn switch_latest<T, U, S, F>(
        &self,
        name: &'static str,
        source: &Signal<T>,
        mut f: F,
    ) -> Signal<U>
    where
        T: SignalValue,
        U: SignalValue,
        S: Stream<Item = U> + Send + 'static,
        F: FnMut(T) -> S + Send + 'static,
    {
        let (publisher, output) = signal();
        let mut upstream = source.subscribe();
        self.tasks.spawn(self.span.clone(), async move {
            let mut inner: Option<BoxStream<'static, U>> = None;
            loop {
                tokio::select! {
                    // Upstream first: a newer value must win over a pending
                    // item of the stream it replaces.
                    biased;
                    next = upstream.next() => match next {
                        Some(value) => {
                            // Start the replacement before dropping the stream
                            // it supersedes, so shared state it holds never
                            // sees a gap.
                            let mut fresh = f(value).boxed();
                            let first = futures::poll!(fresh.next());
                            if inner.replace(fresh).is_some() {
                                debug!(node = name, "superseded in-flight stream dropped");
                            }
                            match first {
                                Poll::Ready(Some(item)) => {
                                    trace!(node = name, "emit");
                                    publisher.publish(item);
                                }
                                Poll::Ready(None) => inner = None,
                                Poll::Pending => {}
                            }
                        }
                        None => break,
                    },
                    Some(item) = next_inner(&mut inner) => {
                        trace!(node = name, "emit");
                        publisher.publish(item);
                    }
                }
            }
            // Upstream is done; the last inner stream may still finish.
            if let Some(mut last) = inner {
                while let Some(item) = last.next().await {
                    publisher.publish(item);
                }
            }
        });
        output
    }

    /// Recomputes `f` from the latest value of both inputs whenever either
    /// changes, once each has produced at least one value.
    pub fn combine_latest<A, B, U, F>(
        &self,
        name: &'static str,
        a: &Signal<A>,
        b: &Signal<B>,
        mut f: F,
    ) -> Signal<U>
    where
        A: SignalValue,
        B: SignalValue,
        U: SignalValue,
        F: FnMut(&A, &B) -> U + Send + 'static,
    {
        let (publisher, output) = signal();
        let mut sub_a = a.subscribe();
        let mut sub_b = b.subscribe();
        self.tasks.spawn(self.span.clone(), async move {
            let (mut last_a, mut last_b) = (None, None);
            let (mut open_a, mut open_b) = (true, true);
            while open_a || open_b {
                tokio::select! {
                    next = sub_a.next(), if open_a => match next {
                        Some(value) => last_a = Some(value),
                        None => open_a = false,
                    },
                    next = sub_b.next(), if open_b => match next {
                        Some(value) => last_b = Some(value),
                        None => open_b = false,
                    },
                }
                match (&last_a, &last_b) {
                    (Some(a), Some(b)) => {
                        trace!(node = name, "emit");
                        publisher.publish(f(a, b));
                    }
                    // An input ended without ever producing a value.
                    (None, _) if !open_a => break,
                    (_, None) if !open_b => break,
                    _ => {}
                }
            }
        });
        output
    }

    /// [`Graph::combine_latest`] over four inputs.
    pub fn combine_latest4<A, B, C, D, U, F>(
        &self,
        name: &'static str,
        inputs: (&Signal<A>, &Signal<B>, &Signal<C>, &Signal<D>),
        mut f: F,
    ) -> Signal<U>
    where
        A: SignalValue,
        B: SignalValue,
        C: SignalValue,
        D: SignalValue,
        U: SignalValue,
        F: FnMut(&A, &B, &C, &D) -> U + Send + 'static,
    {
        let (a, b, c, d) = inputs;
        let ab = self.combine_latest(name, a, b, |a, b| (a.clone(), b.clone()));
        let cd = self.combine_latest(name, c, d, |c, d| (c.clone(), d.clone()));
        self.combine_latest(name, &ab, &cd, move |(a, b), (c, d)| f(a, b, c, d))
    }

    /// Emits the latest value of `other` each time `trigger` fires.
    ///
    /// Triggers that arrive before `other` has any value are ignored.
    pub fn with_latest_from<T, O>(
        &self,
        name: &'static str,
        trigger: &Signal<T>,
        other: &Signal<O>,
    ) -> Signal<O>
    where
        T: SignalValue,
        O: SignalValue,
    {
        let (publisher, output) = signal();
        let mut triggers = trigger.subscribe();
        let other = other.clone();
        self.tasks.spawn(self.span.clone(), async move {
            while triggers.next().await.is_some() {
                match other.latest() {
                    Some(value) => {
                        trace!(node = name, "emit");
                        publisher.publish(value);
                    }
                    None => debug!(node = name, "trigger ignored, nothing to latch yet"),
                }
            }
        });
        output
    }
}

/// Next item of the current inner stream; pending forever when there is none.
async fn next_inner<U>(inner: &mut Option<BoxStream<'static, U>>) -> Option<U> {
    let Some(stream) = inner.as_mut() else {
        return std::future::pending().await;
    };
    let item = stream.next().await;
    if item.is_none() {
        *inner = None;
    }
    item
}
