//! Error types for the motion core.
//!
//! Errors only surface at parse and configuration boundaries. Binding an
//! animation to an element the host cannot resolve is not an error; the
//! binding simply becomes inert.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionError {
    /// Easing identifier could not be parsed
    #[error("Unknown easing: {name}")]
    UnknownEasing { name: String },

    /// Scroll threshold string could not be parsed
    #[error("Invalid threshold '{input}': {reason}")]
    InvalidThreshold { input: String, reason: String },

    /// Toggle action list could not be parsed
    #[error("Invalid toggle actions '{input}': {reason}")]
    InvalidToggleActions { input: String, reason: String },

    /// Color literal could not be parsed
    #[error("Invalid color: {input}")]
    InvalidColor { input: String },

    /// Configuration value out of range
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl MotionError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownEasing { .. }
            | Self::InvalidThreshold { .. }
            | Self::InvalidToggleActions { .. }
            | Self::InvalidColor { .. } => "parse",
            Self::InvalidConfig { .. } => "config",
            Self::SerializationError { .. } => "serialization",
        }
    }

    pub(crate) fn threshold(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        let e = MotionError::UnknownEasing {
            name: "wobble".into(),
        };
        assert_eq!(e.category(), "parse");
        assert_eq!(e.to_string(), "Unknown easing: wobble");

        let e = MotionError::InvalidConfig {
            reason: "interval must be > 0".into(),
        };
        assert_eq!(e.category(), "config");
    }

    #[test]
    fn json_error_converts() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e: MotionError = err.into();
        assert_eq!(e.category(), "serialization");
    }
}
