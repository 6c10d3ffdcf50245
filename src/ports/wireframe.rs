//! Wireframe port: modal prompts shown by the form.

use std::future::Future;
use std::pin::Pin;

/// Completes when the user dismisses the prompt.
pub type PromptFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Presents messages to the user.
pub trait Wireframe: Send + Sync {
    /// Shows `message` and resolves once it has been dismissed.
    fn prompt_for(&self, message: &str) -> PromptFuture;
}
