//! Error types shared across the report pipeline.

use thiserror::Error;

/// Context attached when resolving the current user fails.
pub const GET_USER_CONTEXT: &str = "failed to get user from tracker";

/// Context attached when the issue search fails.
pub const SEARCH_CONTEXT: &str = "failed to search issues";

/// Errors that can abort a report request or plugin startup.
///
/// Unparseable per-item timestamps are deliberately absent: those items are
/// dropped during extraction and never surface as errors.
#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("Config error: missing required setting '{0}'")]
    MissingSetting(&'static str),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{context}: {message}")]
    Tracker {
        context: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),
}

impl ActivityError {
    /// Wrap a transport or auth failure with a fixed context string.
    pub fn tracker(context: &'static str, err: impl std::fmt::Display) -> Self {
        ActivityError::Tracker {
            context,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ActivityError>;
