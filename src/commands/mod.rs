//! Command dispatch and handlers.

pub mod session;
pub mod validate;

use std::time::Duration;

use crate::cli::Command;
use crate::config::SignupConfig;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Session { script, settle_ms, failure_rate } => {
            session::run(script, Duration::from_millis(*settle_ms), *failure_rate)
        }
        Command::Validate { username, password, repeated } => {
            validate::run(
                username.as_deref(),
                password.as_deref(),
                repeated.as_deref(),
            )
        }
    }
}

/// Environment configuration with CLI overrides applied.
fn load_config(failure_rate: Option<f64>) -> Result<SignupConfig, String> {
    let config = SignupConfig::from_env().map_err(|e| format!("Invalid configuration: {e}"))?;
    match failure_rate {
        Some(rate) => config
            .with_failure_rate(rate)
            .map_err(|e| format!("Invalid --failure-rate: {e}")),
        None => Ok(config),
    }
}

/// Single-threaded runtime: the flow's events run on one ordered timeline.
fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))
}
