//! Scripted adapter for the `SignupApi` port.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::TransportError;
use crate::ports::{ApiFuture, SignupApi};
use crate::reactive::signal::lock;

/// Answers availability and signup calls from a script.
///
/// Usernames without a scripted answer are available; signups beyond the
/// scripted queue succeed.
#[derive(Clone, Default)]
pub struct ScriptedSignupApi {
    state: Arc<Mutex<Script>>,
}

#[derive(Default)]
struct Script {
    availability: HashMap<String, Result<bool, TransportError>>,
    availability_latency: HashMap<String, Duration>,
    default_latency: Duration,
    signup_results: VecDeque<Result<bool, TransportError>>,
    signup_latency: Duration,
    availability_calls: Vec<String>,
    signup_calls: Vec<(String, String)>,
}

impl ScriptedSignupApi {
    /// Creates an API where every name is free and every signup succeeds
    /// immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the availability answer for `username`.
    #[must_use]
    pub fn with_availability(
        self,
        username: impl Into<String>,
        answer: Result<bool, TransportError>,
    ) -> Self {
        lock(&self.state)
            .availability
            .insert(username.into(), answer);
        self
    }

    /// Delays the availability answer for one username.
    #[must_use]
    pub fn with_availability_latency(self, username: impl Into<String>, latency: Duration) -> Self {
        lock(&self.state)
            .availability_latency
            .insert(username.into(), latency);
        self
    }

    /// Delays availability answers for names without their own latency.
    #[must_use]
    pub fn with_default_latency(self, latency: Duration) -> Self {
        lock(&self.state).default_latency = latency;
        self
    }

    /// Queues the answer for the next unanswered signup call.
    #[must_use]
    pub fn with_signup_result(self, answer: Result<bool, TransportError>) -> Self {
        lock(&self.state).signup_results.push_back(answer);
        self
    }

    /// Delays every signup answer.
    #[must_use]
    pub fn with_signup_latency(self, latency: Duration) -> Self {
        lock(&self.state).signup_latency = latency;
        self
    }

    /// Usernames looked up so far, in call order.
    #[must_use]
    pub fn availability_calls(&self) -> Vec<String> {
        lock(&self.state).availability_calls.clone()
    }

    /// `(username, password)` pairs submitted so far, in call order.
    #[must_use]
    pub fn signup_calls(&self) -> Vec<(String, String)> {
        lock(&self.state).signup_calls.clone()
    }
}

impl SignupApi for ScriptedSignupApi {
    fn username_available(&self, username: &str) -> ApiFuture<bool> {
        let (answer, latency) = {
            let mut script = lock(&self.state);
            script.availability_calls.push(username.to_owned());
            let answer = script
                .availability
                .get(username)
                .cloned()
                .unwrap_or(Ok(true));
            let latency = script
                .availability_latency
                .get(username)
                .copied()
                .unwrap_or(script.default_latency);
            (answer, latency)
        };
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            answer
        })
    }

    fn signup(&self, username: &str, password: &str) -> ApiFuture<bool> {
        let (answer, latency) = {
            let mut script = lock(&self.state);
            let call = (username.to_owned(), password.to_owned());
            script.signup_calls.push(call);
            (script.signup_results.pop_front().unwrap_or(Ok(true)), script.signup_latency)
        };
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            answer
        })
    }
}
