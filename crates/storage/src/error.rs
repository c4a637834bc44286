//! Typed error enum for the storage layer.

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No session file exists for the requested id.
    #[error("session not found: {id}")]
    NotFound { id: String },

    /// Filesystem operation failed.
    #[error("storage io error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Session file exists but could not be deserialized.
    #[error("corrupt session data: {context}")]
    Corrupt {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Whether this error represents a not-found condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
