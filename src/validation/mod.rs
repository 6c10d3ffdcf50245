//! Field validation outcomes and the synchronous validation rules.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Minimum number of characters (grapheme clusters) an acceptable password
/// has.
pub const MIN_PASSWORD_COUNT: usize = 5;

/// Outcome of validating one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ValidationResult {
    /// Nothing has been entered yet.
    Empty,
    /// An asynchronous check is in flight.
    Validating,
    /// The value passed validation.
    Ok {
        /// Human-readable success note.
        message: String,
    },
    /// The value failed validation.
    Failed {
        /// Human-readable reason.
        message: String,
    },
}

/// Presentation hint for a validation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationTone {
    /// No input yet.
    Neutral,
    /// Waiting on a check.
    Pending,
    /// Passed.
    Positive,
    /// Failed.
    Negative,
}

impl ValidationTone {
    /// Lowercase name of the tone.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Pending => "pending",
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl ValidationResult {
    /// Builds an [`ValidationResult::Ok`] with the given message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self::Ok {
            message: message.into(),
        }
    }

    /// Builds a [`ValidationResult::Failed`] with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// True only for [`ValidationResult::Ok`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The tone a label showing this result should use.
    #[must_use]
    pub fn tone(&self) -> ValidationTone {
        match self {
            Self::Empty => ValidationTone::Neutral,
            Self::Validating => ValidationTone::Pending,
            Self::Ok { .. } => ValidationTone::Positive,
            Self::Failed { .. } => ValidationTone::Negative,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Validating => f.write_str("validating ..."),
            Self::Ok { message } | Self::Failed { message } => f.write_str(message),
        }
    }
}

/// Checks the parts of a username that need no server round-trip.
///
/// Returns the final result for empty or malformed names, `None` when the
/// name still has to be checked for availability.
#[must_use]
pub fn check_username_format(username: &str) -> Option<ValidationResult> {
    if username.is_empty() {
        return Some(ValidationResult::Empty);
    }
    // Letters, numbers and combining marks, so decomposed accents pass.
    if username
        .chars()
        .any(|c| !(c.is_alphanumeric() || is_combining_mark(c)))
    {
        return Some(ValidationResult::failed(
            "Username can only contain numbers or digits",
        ));
    }
    None
}

/// Validates a password by length, counted in user-perceived characters.
#[must_use]
pub fn validate_password(password: &str) -> ValidationResult {
    let count = password.graphemes(true).count();
    if count == 0 {
        return ValidationResult::Empty;
    }
    if count < MIN_PASSWORD_COUNT {
        return ValidationResult::failed(format!(
            "Password must be at least {MIN_PASSWORD_COUNT} characters"
        ));
    }
    ValidationResult::ok("Password acceptable")
}

/// Validates that the repeated password matches the password. Canonically
/// equivalent spellings match.
#[must_use]
pub fn validate_repeated_password(password: &str, repeated: &str) -> ValidationResult {
    if repeated.is_empty() {
        return ValidationResult::Empty;
    }
    if repeated.nfc().eq(password.nfc()) {
        ValidationResult::ok("Password repeated")
    } else {
        ValidationResult::failed("password different")
    }
}
