//! Mock adapter for the `SignupApi` port: no network, configurable delays
//! and a random signup failure.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::config::SignupConfig;
use crate::ports::{ApiFuture, SignupApi};

/// Pretends to be the signup server.
///
/// A username is available unless it is in the configured taken list; a
/// signup succeeds unless a uniform draw falls under the failure rate.
#[derive(Clone)]
pub struct MockSignupApi {
    taken: Arc<HashSet<String>>,
    failure_rate: f64,
    availability_latency: Duration,
    signup_latency: Duration,
}

impl MockSignupApi {
    /// Builds the mock from configuration.
    #[must_use]
    pub fn new(config: &SignupConfig) -> Self {
        Self {
            taken: Arc::new(config.taken_usernames.iter().map(|n| n.to_lowercase()).collect()),
            failure_rate: config.failure_rate,
            availability_latency: config.availability_latency,
            signup_latency: config.signup_latency,
        }
    }
}

impl SignupApi for MockSignupApi {
    fn username_available(&self, username: &str) -> ApiFuture<bool> {
        let available = !self.taken.contains(&username.to_lowercase());
        let latency = self.availability_latency;
        let name = username.to_owned();
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            debug!(username = %name, available, "mock availability answered");
            Ok(available)
        })
    }

    fn signup(&self, username: &str, _password: &str) -> ApiFuture<bool> {
        // Decided up front so the outcome does not depend on when it is polled.
        let failed = self.failure_rate > 0.0 && rand::rng().random_bool(self.failure_rate);
        let latency = self.signup_latency;
        let name = username.to_owned();
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            debug!(username = %name, succeeded = !failed, "mock signup answered");
            Ok(!failed)
        })
    }
}
