use std::pin::Pin;

use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use vidocs_core::{AssetHandle, TurnRole};

use crate::error::ProviderError;
use crate::wire::{
    AssetState, GenerateRequest, GenerateResponse, RemoteFile, UploadResponse, WireContent,
    WirePart,
};

/// Request timeout for provider calls. Individual calls surface a timeout
/// as that step's failure instead of hanging the orchestration.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Lazy, finite, single-consumption sequence of generated text fragments.
/// Emission order is the concatenation order.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// One piece of prompt content sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    Asset(AssetHandle),
}

/// One role-tagged entry of a reconstructed chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: TurnRole,
    pub parts: Vec<PromptPart>,
}

impl HistoryTurn {
    #[must_use]
    pub fn new(role: TurnRole, parts: Vec<PromptPart>) -> Self {
        Self { role, parts }
    }
}

/// Client for the remote provider's file and generation REST API.
pub struct ProviderClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderClient {
    /// Creates a new provider client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Uploads a binary artifact; the provider processes it asynchronously.
    pub async fn upload_asset(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<(AssetHandle, AssetState), ProviderError> {
        let response = self
            .client
            .post(self.endpoint("upload/v1beta/files"))
            .header("x-goog-api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ProviderError::Upload(format!("HTTP {}: {body}", status.as_u16())));
        }
        let upload: UploadResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::JsonParse { context: "upload response".to_owned(), source: e }
        })?;
        Ok(upload.file.into_handle())
    }

    /// Re-fetches the current status and handle of an uploaded asset.
    pub async fn asset_state(
        &self,
        name: &str,
    ) -> Result<(AssetHandle, AssetState), ProviderError> {
        let response = self
            .client
            .get(self.endpoint(&format!("v1beta/{name}")))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let body = Self::read_success_body(response).await?;
        let file: RemoteFile = serde_json::from_str(&body).map_err(|e| {
            ProviderError::JsonParse { context: format!("asset status for {name}"), source: e }
        })?;
        Ok(file.into_handle())
    }

    /// Deletes an uploaded asset from the provider.
    pub async fn delete_asset(&self, name: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("v1beta/{name}")))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;
        Self::read_success_body(response).await?;
        Ok(())
    }

    /// Starts a streaming generation call with one model.
    ///
    /// An `Err` here is an invocation-time failure (network, quota, config)
    /// that the fallback engine absorbs. Once `Ok`, the model has begun
    /// producing output and is the winner.
    pub async fn stream_generate(
        &self,
        model: &str,
        parts: &[PromptPart],
        system: &str,
    ) -> Result<TextStream, ProviderError> {
        let request = GenerateRequest::new(
            vec![WireContent::from_parts(TurnRole::User, parts)],
            system,
        );
        let response = self
            .client
            .post(self.endpoint(&format!("v1beta/models/{model}:streamGenerateContent?alt=sse")))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::HttpStatus { code: status.as_u16(), body });
        }

        let stream = try_stream! {
            let mut chunks = response.bytes_stream();
            let mut sse_buffer = String::new();
            while let Some(item) = chunks.next().await {
                let bytes = item.map_err(|e| ProviderError::Stream(e.to_string()))?;
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| ProviderError::Stream(e.to_string()))?;
                sse_buffer.push_str(text);

                while let Some(newline_index) = sse_buffer.find('\n') {
                    let line = sse_buffer.drain(..=newline_index).collect::<String>();
                    let line = line.trim();
                    if !line.starts_with("data:") {
                        continue;
                    }
                    let payload = line.trim_start_matches("data:").trim();
                    if payload.is_empty() || payload == "[DONE]" {
                        continue;
                    }
                    let parsed: GenerateResponse = serde_json::from_str(payload)
                        .map_err(|e| ProviderError::JsonParse {
                            context: "stream chunk".to_owned(),
                            source: e,
                        })?;
                    if let Some(fragment) = parsed.first_candidate_text() {
                        if !fragment.is_empty() {
                            yield fragment;
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream) as TextStream)
    }

    /// Non-streaming generation call; returns the full response text.
    pub async fn generate(
        &self,
        model: &str,
        parts: &[PromptPart],
        system: &str,
    ) -> Result<String, ProviderError> {
        let contents = vec![WireContent::from_parts(TurnRole::User, parts)];
        self.generate_contents(model, contents, system).await
    }

    /// Stateful chat call: replays the reconstructed history and sends one
    /// new user message, returning the model's reply text.
    pub async fn chat(
        &self,
        model: &str,
        system: &str,
        history: &[HistoryTurn],
        message: &str,
    ) -> Result<String, ProviderError> {
        let mut contents: Vec<WireContent> =
            history.iter().map(|t| WireContent::from_parts(t.role, &t.parts)).collect();
        contents.push(WireContent {
            role: TurnRole::User,
            parts: vec![WirePart::text(message)],
        });
        self.generate_contents(model, contents, system).await
    }

    async fn generate_contents(
        &self,
        model: &str,
        contents: Vec<WireContent>,
        system: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerateRequest::new(contents, system);
        let response = self
            .client
            .post(self.endpoint(&format!("v1beta/models/{model}:generateContent")))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let body = Self::read_success_body(response).await?;
        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::JsonParse { context: "generate response".to_owned(), source: e }
        })?;
        parsed.first_candidate_text().ok_or(ProviderError::EmptyResponse)
    }

    async fn read_success_body(response: reqwest::Response) -> Result<String, ProviderError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            Ok(body)
        } else {
            Err(ProviderError::HttpStatus { code: status.as_u16(), body })
        }
    }
}
