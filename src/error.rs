//! Crate-wide error type.
//!
//! Only genuinely recoverable failures live here. Engine calls made in the
//! wrong state (answering twice, advancing before answering) are not errors:
//! they return `None` and leave a `tracing` warning behind.

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TutorError {
    /// Malformed hand or range notation. Always recoverable by re-prompting.
    #[error("invalid hand notation {notation:?}: {reason}")]
    InvalidNotation {
        notation: String,
        reason: &'static str,
    },

    /// A content-unit id that the curriculum does not declare.
    #[error("unknown content unit {0:?}")]
    UnknownUnit(String),

    /// Progress document could not be loaded or saved.
    #[error("{context}: {source}")]
    Persistence {
        context: &'static str,
        #[source]
        source: BoxedSource,
    },

    #[error("{field}: {message}")]
    InvalidConfig { field: String, message: String },
}

impl TutorError {
    pub fn invalid_notation(notation: impl Into<String>, reason: &'static str) -> Self {
        TutorError::InvalidNotation {
            notation: notation.into(),
            reason,
        }
    }

    pub fn persistence(context: &'static str, source: impl Into<BoxedSource>) -> Self {
        TutorError::Persistence {
            context,
            source: source.into(),
        }
    }

    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        TutorError::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}
