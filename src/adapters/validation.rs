//! Default validation service backed by a [`SignupApi`].

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::error::TransportError;
use crate::ports::{SignupApi, UsernameValidation, ValidationService};
use crate::validation::{self, ValidationResult};

/// Label shown when the availability lookup itself failed.
pub const SERVER_ERROR_MESSAGE: &str = "Error contacting server";

/// Validation rules of the signup form, asking `api` whether a username is
/// still free.
pub struct DefaultValidationService {
    api: Arc<dyn SignupApi>,
}

impl DefaultValidationService {
    /// Creates a validation service using `api` for availability lookups.
    #[must_use]
    pub fn new(api: Arc<dyn SignupApi>) -> Self {
        Self { api }
    }
}

impl ValidationService for DefaultValidationService {
    fn validate_username(&self, username: &str) -> UsernameValidation {
        if let Some(result) = validation::check_username_format(username) {
            return stream::once(async move { Ok::<_, TransportError>(result) }).boxed();
        }

        let lookup = self.api.username_available(username);
        let name = username.to_owned();
        let answer = async move {
            let result = match lookup.await {
                Ok(true) => ValidationResult::ok("Username available"),
                Ok(false) => ValidationResult::failed("Username already taken"),
                Err(err) => {
                    warn!(username = %name, %err, "availability lookup failed");
                    ValidationResult::failed(SERVER_ERROR_MESSAGE)
                }
            };
            Ok::<_, TransportError>(result)
        };
        stream::once(async { Ok::<_, TransportError>(ValidationResult::Validating) })
            .chain(stream::once(answer))
            .boxed()
    }

    fn validate_password(&self, password: &str) -> ValidationResult {
        validation::validate_password(password)
    }

    fn validate_repeated_password(&self, password: &str, repeated: &str) -> ValidationResult {
        validation::validate_repeated_password(password, repeated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::ScriptedSignupApi;

    async fn collect(service: &DefaultValidationService, name: &str) -> Vec<ValidationResult> {
        service
            .validate_username(name)
            .map(|item| item.expect("default service never yields errors"))
            .collect()
            .await
    }

    #[tokio::test]
    async fn empty_username_skips_lookup() {
        let api = Arc::new(ScriptedSignupApi::new());
        let service = DefaultValidationService::new(api.clone());

        assert_eq!(collect(&service, "").await, vec![ValidationResult::Empty]);
        assert!(api.availability_calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_username_skips_lookup() {
        let api = Arc::new(ScriptedSignupApi::new());
        let service = DefaultValidationService::new(api.clone());

        for name in ["with space", "bang!", "hy-phen", "ünï cödé"] {
            assert_eq!(
                collect(&service, name).await,
                vec![ValidationResult::failed("Username can only contain numbers or digits")]
            );
        }
        assert!(api.availability_calls().is_empty());
    }

    #[tokio::test]
    async fn available_username_reports_validating_then_ok() {
        let api =
            Arc::new(ScriptedSignupApi::new().with_availability("freevalidusername", Ok(true)));
        let service = DefaultValidationService::new(api.clone());

        assert_eq!(
            collect(&service, "freevalidusername").await,
            vec![
                ValidationResult::Validating,
                ValidationResult::ok("Username available"),
            ]
        );
        assert_eq!(
            api.availability_calls(),
            vec!["freevalidusername".to_string()]
        );
    }

    #[tokio::test]
    async fn taken_username_fails() {
        let api = Arc::new(ScriptedSignupApi::new().with_availability("octocat", Ok(false)));
        let service = DefaultValidationService::new(api);

        assert_eq!(
            collect(&service, "octocat").await,
            vec![
                ValidationResult::Validating,
                ValidationResult::failed("Username already taken"),
            ]
        );
    }

    #[tokio::test]
    async fn lookup_error_becomes_server_error() {
        let api = Arc::new(ScriptedSignupApi::new().with_availability(
            "someone",
            Err(TransportError::Unreachable("offline".into())),
        ));
        let service = DefaultValidationService::new(api);

        assert_eq!(
            collect(&service, "someone").await,
            vec![
                ValidationResult::Validating,
                ValidationResult::failed(SERVER_ERROR_MESSAGE),
            ]
        );
    }

    #[test]
    fn password_rules_delegate() {
        let service = DefaultValidationService::new(Arc::new(ScriptedSignupApi::new()));
        assert_eq!(
            service.validate_password("abc"),
            validation::validate_password("abc")
        );
        assert_eq!(
            service.validate_repeated_password("abcdef", "abcdef"),
            ValidationResult::ok("Password repeated")
        );
    }
}
