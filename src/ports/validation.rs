//! Validation service port.

use futures::stream::BoxStream;

use crate::error::TransportError;
use crate::validation::ValidationResult;

/// Stream of results for one username check.
pub type UsernameValidation = BoxStream<'static, Result<ValidationResult, TransportError>>;

/// Turns raw field text into [`ValidationResult`]s.
pub trait ValidationService: Send + Sync {
    /// Checks a username. Yields a single final result for input that needs
    /// no lookup; otherwise [`ValidationResult::Validating`] first and the
    /// lookup outcome afterwards.
    fn validate_username(&self, username: &str) -> UsernameValidation;

    /// Checks a password.
    fn validate_password(&self, password: &str) -> ValidationResult;

    /// Checks that `repeated` matches `password`.
    fn validate_repeated_password(&self, password: &str, repeated: &str) -> ValidationResult;
}
