//! Small reactive toolkit the signup flow is built from.
//!
//! - [`Signal`]: multicast channel replaying its latest value
//! - [`Graph`]: operators (map, latest-wins switch, combine-latest, ...)
//!   running as tasks owned by the graph
//! - [`ActivityTracker`]: "anything in flight" flag for wrapped futures

pub mod activity;
pub mod graph;
pub mod signal;
pub mod tasks;

pub use activity::ActivityTracker;
pub use graph::Graph;
pub use signal::{signal, Publisher, Signal, SignalValue, Subscription};
pub use tasks::TaskSet;
