//! Scripted form sessions replayed by `signup session`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// One UI event in a session script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The username field now reads `text`.
    Username {
        /// Field text.
        text: String,
    },
    /// The password field now reads `text`.
    Password {
        /// Field text.
        text: String,
    },
    /// The repeated password field now reads `text`.
    RepeatedPassword {
        /// Field text.
        text: String,
    },
    /// The signup button is tapped.
    Tap,
    /// Nothing happens for `ms` milliseconds.
    Wait {
        /// Pause length.
        ms: u64,
    },
}

/// A named list of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Human-readable name, echoed in the output.
    #[serde(default)]
    pub name: String,
    /// Events in the order they happen.
    pub events: Vec<SessionEvent>,
}

impl SessionScript {
    /// Parses a script from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid session script.
    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, ScriptError> {
        serde_yaml::from_str(text).map_err(|source| ScriptError::Parse {
            path: origin.to_owned(),
            source,
        })
    }

    /// Reads and parses a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: origin.clone(),
            source,
        })?;
        Self::from_yaml(&text, &origin)
    }
}
