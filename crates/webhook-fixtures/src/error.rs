//! Error types for fixture generation.

use thiserror::Error;

/// Errors raised while generating fixtures or their timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The event envelope could not be serialised to JSON.
    #[error("failed to serialise event envelope: {message}")]
    Serialization {
        /// Serialiser diagnostic.
        message: String,
    },

    /// A seeding window must not run backwards in time.
    #[error("seed window must not be negative, got {window_ms} ms")]
    NegativeWindow {
        /// Offending window length in milliseconds.
        window_ms: i64,
    },

    /// A computed timestamp falls outside the representable range.
    #[error("generated timestamp is out of range")]
    TimestampOutOfRange,
}

impl From<serde_json::Error> for GenerationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            message: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_window_formats_correctly() {
        let err = GenerationError::NegativeWindow { window_ms: -5 };
        assert_eq!(
            err.to_string(),
            "seed window must not be negative, got -5 ms"
        );
    }

    #[test]
    fn out_of_range_formats_correctly() {
        assert_eq!(
            GenerationError::TimestampOutOfRange.to_string(),
            "generated timestamp is out of range"
        );
    }
}
