//! Typed error enum for the orchestration layer.
//!
//! Unifies storage and provider failures so the HTTP layer can match on
//! specific failure modes instead of downcasting opaque boxes.

use thiserror::Error;
use vidocs_provider::ProviderError;
use vidocs_storage::StorageError;

/// Orchestration error unifying storage and provider failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Session store operation failed.
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Remote provider call failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// Local staging copy could not be written or removed.
    #[error("staging io error: {0}")]
    Staging(#[source] std::io::Error),
}

impl ServiceError {
    /// Whether this error represents a missing session.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }

    /// Whether the whole model fallback chain was exhausted.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::AllModelsExhausted))
    }
}
