//! Model fallback engine.
//!
//! Folds a priority-ordered chain of model identifiers left to right: each
//! candidate gets one invocation, invocation failures are absorbed, and the
//! first candidate that begins producing output wins.

use std::time::Duration;

use crate::client::{PromptPart, ProviderClient, TextStream};
use crate::error::ProviderError;

/// Attempts generation with each candidate in order.
///
/// Returns the stream together with the identifier of the winning model so
/// the caller can persist it and pin future chat turns to the same backend
/// behavior. Every candidate failing yields `AllModelsExhausted`.
pub async fn generate_with_fallback(
    client: &ProviderClient,
    parts: &[PromptPart],
    system: &str,
    chain: &[String],
    backoff: Duration,
) -> Result<(TextStream, String), ProviderError> {
    for model in chain {
        tracing::info!(%model, "attempting generation");
        match client.stream_generate(model, parts, system).await {
            Ok(stream) => return Ok((stream, model.clone())),
            Err(e) => {
                tracing::warn!(%model, error = %e, "model failed, advancing fallback chain");
                tokio::time::sleep(backoff).await;
            },
        }
    }
    tracing::error!("all fallback candidates failed");
    Err(ProviderError::AllModelsExhausted)
}
