//! Typed error enum for the provider crate.

use thiserror::Error;

/// Errors from remote provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("remote asset processing failed: {0}")]
    AssetProcessingFailed(String),
    #[error("remote asset still processing after {attempts} status polls")]
    ProcessingTimeout { attempts: u32 },
    #[error("generation stream error: {0}")]
    Stream(String),
    #[error("empty response: no candidates returned")]
    EmptyResponse,
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("All AI models failed to respond.")]
    AllModelsExhausted,
}
