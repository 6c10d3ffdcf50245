//! The signup form's dataflow.
//!
//! Raw field text runs through the validators into per-field validation
//! signals, which combine with the in-flight flag into `signup_enabled`.
//! Separately, each submit tap latches the latest username/password pair,
//! calls the signup API under the activity tracker, shows the result prompt
//! and only then reports the outcome on `signed_in`.
//!
//! Every output is a [`Signal`]: shared between observers, replaying its
//! latest value to late subscribers.

pub mod inputs;

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::adapters::validation::SERVER_ERROR_MESSAGE;
use crate::context::ServiceContext;
use crate::reactive::{ActivityTracker, Graph, Signal};
use crate::validation::ValidationResult;

pub use inputs::{FormController, SignupInputs};

/// Prompt shown after a successful signup.
pub const SIGNED_IN_MESSAGE: &str = "Mock: Signed in to GitHub.";
/// Prompt shown after a failed signup.
pub const SIGN_IN_FAILED_MESSAGE: &str = "Mock: Sign in to GitHub failed";

/// Latest username and password, latched when the button is tapped.
#[derive(Clone, PartialEq, Eq)]
struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Current value of every output, for rendering a whole form at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    /// See [`SignupFlow::validated_username`].
    pub validated_username: Option<ValidationResult>,
    /// See [`SignupFlow::validated_password`].
    pub validated_password: Option<ValidationResult>,
    /// See [`SignupFlow::validated_password_repeated`].
    pub validated_password_repeated: Option<ValidationResult>,
    /// See [`SignupFlow::signup_enabled`].
    pub signup_enabled: Option<bool>,
    /// See [`SignupFlow::signing_in`].
    pub signing_in: Option<bool>,
    /// See [`SignupFlow::signed_in`].
    pub signed_in: Option<bool>,
}

/// One live signup form session.
///
/// Dropping it tears the session down: every internal task is aborted and
/// subscribers see their streams end.
pub struct SignupFlow {
    session_id: String,
    validated_username: Signal<ValidationResult>,
    validated_password: Signal<ValidationResult>,
    validated_password_repeated: Signal<ValidationResult>,
    signing_in: Signal<bool>,
    signed_in: Signal<bool>,
    signup_enabled: Signal<bool>,
    graph: Graph,
}

impl SignupFlow {
    /// Wires `inputs` through the collaborators in `ctx`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn new(inputs: SignupInputs, ctx: &ServiceContext) -> Self {
        let session_id = Uuid::new_v4().to_string();
        let graph = Graph::new(info_span!("signup_session", session = %session_id));

        let username = graph.source("username", inputs.username);
        let password = graph.source("password", inputs.password);
        let repeated_password = graph.source("repeated_password", inputs.repeated_password);
        let submit_taps = graph.source("submit_taps", inputs.submit_taps);

        let validation = Arc::clone(&ctx.validation);
        let validated_username = graph.switch_latest(
            "validated_username",
            &username,
            move |name: String| {
                validation.validate_username(&name).map(|result| {
                    result.unwrap_or_else(|err| {
                        warn!(%err, "username validation failed");
                        ValidationResult::failed(SERVER_ERROR_MESSAGE)
                    })
                })
            },
        );

        let validation = Arc::clone(&ctx.validation);
        let validated_password = graph.map("validated_password", &password, move |text: String| {
            validation.validate_password(&text)
        });

        let validation = Arc::clone(&ctx.validation);
        let validated_password_repeated = graph.combine_latest(
            "validated_password_repeated",
            &password,
            &repeated_password,
            move |password: &String, repeated: &String| {
                validation.validate_repeated_password(password, repeated)
            },
        );

        let tracker = ActivityTracker::new();
        let signing_in = tracker.is_active();

        let credentials = graph.combine_latest(
            "credentials",
            &username,
            &password,
            |u: &String, p: &String| Credentials {
                username: u.clone(),
                password: p.clone(),
            },
        );
        let submissions = graph.with_latest_from("submissions", &submit_taps, &credentials);

        let api = Arc::clone(&ctx.api);
        let wireframe = Arc::clone(&ctx.wireframe);
        let signed_in = graph.switch_latest(
            "signed_in",
            &submissions,
            move |credentials: Credentials| {
                let api = Arc::clone(&api);
                let wireframe = Arc::clone(&wireframe);
                let tracker = tracker.clone();
                stream::once(async move {
                    debug!(?credentials, "submitting signup");
                    let signup = api.signup(&credentials.username, &credentials.password);
                    let signed_in = tracker.track(signup).await.unwrap_or_else(|err| {
                        warn!(%err, "signup call failed");
                        false
                    });
                    info!(username = %credentials.username, signed_in, "signup finished");
                    let message = if signed_in {
                        SIGNED_IN_MESSAGE
                    } else {
                        SIGN_IN_FAILED_MESSAGE
                    };
                    wireframe.prompt_for(message).await;
                    signed_in
                })
            },
        );

        let enabled = graph.combine_latest4(
            "signup_enabled",
            (
                &validated_username,
                &validated_password,
                &validated_password_repeated,
                &signing_in,
            ),
            |username: &ValidationResult,
             password: &ValidationResult,
             repeated: &ValidationResult,
             signing_in: &bool| {
                username.is_valid() && password.is_valid() && repeated.is_valid() && !signing_in
            },
        );
        let signup_enabled = graph.distinct_until_changed("signup_enabled", &enabled);

        debug!(session = %session_id, "signup flow wired");
        Self {
            session_id,
            validated_username,
            validated_password,
            validated_password_repeated,
            signing_in,
            signed_in,
            signup_enabled,
            graph,
        }
    }

    /// Identifier of this session, also recorded on its tracing span.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Username check, latest input wins.
    #[must_use]
    pub fn validated_username(&self) -> &Signal<ValidationResult> {
        &self.validated_username
    }

    /// Password check.
    #[must_use]
    pub fn validated_password(&self) -> &Signal<ValidationResult> {
        &self.validated_password
    }

    /// Repeated password check against the latest password.
    #[must_use]
    pub fn validated_password_repeated(&self) -> &Signal<ValidationResult> {
        &self.validated_password_repeated
    }

    /// `true` while a signup call is in flight.
    #[must_use]
    pub fn signing_in(&self) -> &Signal<bool> {
        &self.signing_in
    }

    /// Outcome of the latest submission, reported after its prompt closes.
    #[must_use]
    pub fn signed_in(&self) -> &Signal<bool> {
        &self.signed_in
    }

    /// Whether the signup button should be enabled. Only changes are emitted.
    #[must_use]
    pub fn signup_enabled(&self) -> &Signal<bool> {
        &self.signup_enabled
    }

    /// Latest value of every output.
    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            validated_username: self.validated_username.latest(),
            validated_password: self.validated_password.latest(),
            validated_password_repeated: self.validated_password_repeated.latest(),
            signup_enabled: self.signup_enabled.latest(),
            signing_in: self.signing_in.latest(),
            signed_in: self.signed_in.latest(),
        }
    }

    /// Number of internal tasks still running.
    #[must_use]
    pub fn running_tasks(&self) -> usize {
        self.graph.running_tasks()
    }
}

impl Drop for SignupFlow {
    fn drop(&mut self) {
        debug!(session = %self.session_id, "signup flow torn down");
        self.graph.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            username: "alice".into(),
            password: "hunter22".into(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter22"));
    }
}
