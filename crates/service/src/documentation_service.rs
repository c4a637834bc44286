use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use vidocs_core::{AssetHandle, Config, DEFAULT_TITLE, SYSTEM_PROMPT};
use vidocs_provider::{
    await_ready, generate_with_fallback, PromptPart, ProviderClient, VIDEO_MIME,
};
use vidocs_storage::SessionStore;

use crate::error::ServiceError;

/// Result of a successful documentation run.
#[derive(Debug, Clone)]
pub struct AnalyzeOutcome {
    pub session_id: String,
    pub title: String,
    pub markdown: String,
}

/// Documentation flow: stage → upload → await readiness → fallback
/// generation → title derivation → persist.
///
/// No partial session is persisted on failure, and both the local staging
/// copy and the remote asset are released on every exit path.
pub struct DocumentationService {
    client: Arc<ProviderClient>,
    store: SessionStore,
    config: Config,
}

impl DocumentationService {
    #[must_use]
    pub fn new(client: Arc<ProviderClient>, store: SessionStore, config: Config) -> Self {
        Self { client, store, config }
    }

    /// Turns an uploaded video into a persisted documentation session.
    pub async fn analyze(
        &self,
        video: Vec<u8>,
        language: &str,
    ) -> Result<AnalyzeOutcome, ServiceError> {
        let staging = StagedCopy::write(&self.config.data_dir, &video)?;
        drop(video);
        let outcome = self.upload_and_generate(&staging, language).await;
        staging.remove();
        let (markdown, model, asset) = outcome?;

        let title = self.derive_title(&model, &markdown).await;
        let record = self.store.create(title, markdown, Some(asset), model)?;
        tracing::info!(session_id = %record.id, model = %record.resolved_model, "session persisted");
        Ok(AnalyzeOutcome {
            session_id: record.id,
            title: record.title,
            markdown: record.markdown,
        })
    }

    async fn upload_and_generate(
        &self,
        staging: &StagedCopy,
        language: &str,
    ) -> Result<(String, String, AssetHandle), ServiceError> {
        let bytes = fs::read(&staging.path).map_err(ServiceError::Staging)?;
        let (handle, _) = self.client.upload_asset(bytes, VIDEO_MIME).await?;
        tracing::info!(asset = %handle.name, "upload complete");

        let result = self.generate_from_asset(&handle, language).await;
        // Release runs whether generation, polling, or draining failed.
        if let Err(e) = self.client.delete_asset(&handle.name).await {
            tracing::warn!(asset = %handle.name, error = %e, "failed to delete remote asset");
        }
        result
    }

    async fn generate_from_asset(
        &self,
        handle: &AssetHandle,
        language: &str,
    ) -> Result<(String, String, AssetHandle), ServiceError> {
        let ready = await_ready(&self.client, handle, &self.config.poll).await?;

        let prompt = format!(
            "Generate comprehensive technical documentation in Markdown format based on this \
             video. The output MUST be in {language}. Include sections for Goal, Implementation \
             Details, and Key Concepts."
        );
        let parts = vec![PromptPart::Text(prompt), PromptPart::Asset(ready.clone())];
        let (mut stream, model) = generate_with_fallback(
            &self.client,
            &parts,
            SYSTEM_PROMPT,
            &self.config.fallback_chain,
            self.config.fallback_backoff,
        )
        .await?;

        let mut markdown = String::new();
        while let Some(fragment) = stream.next().await {
            markdown.push_str(&fragment?);
        }
        Ok((markdown, model, ready))
    }

    /// Derives a short title with the model that won the fallback race.
    /// Failure is a non-fatal degrade to a fixed default.
    async fn derive_title(&self, model: &str, markdown: &str) -> String {
        let prompt = format!(
            "Generate a short, catchy, 3-5 word title for this documentation based on the \
             content:\n\n{}...",
            truncate(markdown, 500)
        );
        match self.client.generate(model, &[PromptPart::Text(prompt)], SYSTEM_PROMPT).await {
            Ok(raw) => {
                let title = raw.trim().replace(['"', '*'], "");
                if title.is_empty() { DEFAULT_TITLE.to_owned() } else { title }
            },
            Err(e) => {
                tracing::warn!(error = %e, "title derivation failed, using default");
                DEFAULT_TITLE.to_owned()
            },
        }
    }
}

/// Local staging copy of the uploaded bytes. The provider upload reads
/// from this file, and it is removed after the generation step regardless
/// of its outcome.
struct StagedCopy {
    path: PathBuf,
}

impl StagedCopy {
    fn write(data_dir: &Path, bytes: &[u8]) -> Result<Self, ServiceError> {
        let dir = data_dir.join("staging");
        fs::create_dir_all(&dir).map_err(ServiceError::Staging)?;
        let path = dir.join(format!("{}.webm", uuid::Uuid::new_v4()));
        fs::write(&path, bytes).map_err(ServiceError::Staging)?;
        Ok(Self { path })
    }

    fn remove(self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove staging copy");
        }
    }
}

/// Truncates a string to the given maximum length at a char boundary.
fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        s.get(..end).unwrap_or("")
    }
}
