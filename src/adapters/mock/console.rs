//! Console adapter for the `Wireframe` port.

use std::time::Duration;

use crate::ports::{PromptFuture, Wireframe};

/// Prints prompts to stdout and dismisses them after a fixed delay, the
/// terminal stand-in for an alert with a single OK button.
#[derive(Debug, Clone, Default)]
pub struct ConsoleWireframe {
    dismiss_after: Duration,
}

impl ConsoleWireframe {
    /// Creates a console wireframe.
    #[must_use]
    pub fn new(dismiss_after: Duration) -> Self {
        Self { dismiss_after }
    }
}

impl Wireframe for ConsoleWireframe {
    fn prompt_for(&self, message: &str) -> PromptFuture {
        println!("[prompt] {message} (OK)");
        let delay = self.dismiss_after;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn prompt_stays_up_for_dismiss_delay() {
        let wireframe = ConsoleWireframe::new(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        wireframe.prompt_for("Mock: Signed in to GitHub.").await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
