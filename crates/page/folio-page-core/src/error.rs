//! Error types for the page runtime.

use folio_motion::MotionError;
use serde::{Deserialize, Serialize};

/// Contact form rejections.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FormError {
    #[error("Field '{field}' is required")]
    MissingField { field: String },

    #[error("Invalid email address: {input}")]
    InvalidEmail { input: String },

    #[error("A submission is already in flight")]
    SubmissionInFlight,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PageError {
    /// Page configuration value out of range
    #[error("Invalid page config: {reason}")]
    InvalidConfig { reason: String },

    /// Motion-level parse or config error
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// JSON (de)serialization error
    #[error("JSON error: {reason}")]
    Json { reason: String },

    #[error(transparent)]
    Form(#[from] FormError),
}

impl PageError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "config",
            Self::Motion(inner) => inner.category(),
            Self::Json { .. } => "serialization",
            Self::Form(_) => "form",
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_the_source() {
        let e: PageError = MotionError::UnknownEasing {
            name: "wobble".into(),
        }
        .into();
        assert_eq!(e.category(), "parse");
        assert_eq!(e.to_string(), "Unknown easing: wobble");

        let e: PageError = FormError::SubmissionInFlight.into();
        assert_eq!(e.category(), "form");
        assert_eq!(PageError::config("x").category(), "config");
    }
}
