//! Service context bundling the collaborators a signup flow needs.

use std::sync::Arc;

use crate::adapters::mock::{ConsoleWireframe, MockSignupApi};
use crate::adapters::validation::DefaultValidationService;
use crate::config::SignupConfig;
use crate::ports::{SignupApi, ValidationService, Wireframe};

/// Bundles the port trait objects a [`SignupFlow`](crate::flow::SignupFlow)
/// is wired against.
///
/// Constructors pick the adapter set; tests build one by hand from scripted
/// adapters.
#[derive(Clone)]
pub struct ServiceContext {
    /// Remote API used for signups.
    pub api: Arc<dyn SignupApi>,
    /// Field validation rules.
    pub validation: Arc<dyn ValidationService>,
    /// Prompt presenter.
    pub wireframe: Arc<dyn Wireframe>,
}

impl ServiceContext {
    /// Wires `api` and `wireframe` with the default validation rules on top
    /// of the same API.
    #[must_use]
    pub fn new(api: Arc<dyn SignupApi>, wireframe: Arc<dyn Wireframe>) -> Self {
        let validation = Arc::new(DefaultValidationService::new(Arc::clone(&api)));
        Self {
            api,
            validation,
            wireframe,
        }
    }

    /// Mock backend and console prompts, configured from `config`.
    #[must_use]
    pub fn mock(config: &SignupConfig) -> Self {
        Self::new(
            Arc::new(MockSignupApi::new(config)),
            Arc::new(ConsoleWireframe::new(config.prompt_dismiss)),
        )
    }

    /// Replaces the validation service.
    #[must_use]
    pub fn with_validation(mut self, validation: Arc<dyn ValidationService>) -> Self {
        self.validation = validation;
        self
    }
}
