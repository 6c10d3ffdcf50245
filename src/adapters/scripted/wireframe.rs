//! Scripted adapter for the `Wireframe` port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ports::{PromptFuture, Wireframe};
use crate::reactive::signal::lock;

/// Records every prompt and dismisses it after a fixed delay.
#[derive(Clone, Default)]
pub struct ScriptedWireframe {
    prompts: Arc<Mutex<Vec<String>>>,
    dismiss_after: Duration,
}

impl ScriptedWireframe {
    /// A wireframe whose prompts are dismissed immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A wireframe whose prompts stay up for `delay`.
    #[must_use]
    pub fn dismissing_after(delay: Duration) -> Self {
        Self {
            dismiss_after: delay,
            ..Self::default()
        }
    }

    /// Messages shown so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

impl Wireframe for ScriptedWireframe {
    fn prompt_for(&self, message: &str) -> PromptFuture {
        lock(&self.prompts).push(message.to_owned());
        let delay = self.dismiss_after;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        })
    }
}
