//! Error types shared across the crate.
//!
//! Collaborator failures never reach the output signals of a
//! [`SignupFlow`](crate::flow::SignupFlow); they are substituted with a
//! fallback value where the collaborator is invoked.

use thiserror::Error;

/// Failure reported by an external collaborator (availability lookup,
/// signup call).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The collaborator could not be reached.
    #[error("server unreachable: {0}")]
    Unreachable(String),
    /// The collaborator answered with something the client cannot use.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// An environment value that could not be interpreted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The variable is set but is not a number.
    #[error("{var} must be a number, got {value:?}")]
    NotANumber {
        /// Environment variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
    },
    /// The failure rate is outside `0.0..=1.0`.
    #[error("failure rate must be between 0.0 and 1.0, got {0}")]
    FailureRateOutOfRange(f64),
}

/// A session script that could not be loaded.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Reading the script file failed.
    #[error("failed to read session script {path}: {source}")]
    Read {
        /// Script path as given.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The script is not valid YAML for a session.
    #[error("failed to parse session script {path}: {source}")]
    Parse {
        /// Script path as given.
        path: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_messages() {
        let err = TransportError::Unreachable("connection refused".into());
        assert_eq!(err.to_string(), "server unreachable: connection refused");
    }

    #[test]
    fn config_error_names_variable() {
        let err = ConfigError::NotANumber {
            var: "SIGNUP_LATENCY_MS",
            value: "soon".into(),
        };
        assert_eq!(
            err.to_string(),
            "SIGNUP_LATENCY_MS must be a number, got \"soon\""
        );
    }
}
