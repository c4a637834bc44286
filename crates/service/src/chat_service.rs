use std::sync::Arc;

use vidocs_core::{Config, ConversationTurn, SYSTEM_PROMPT};
use vidocs_provider::ProviderClient;
use vidocs_storage::SessionStore;

use crate::error::ServiceError;
use crate::reconstruct;

/// Chat flow: load → reconstruct → stateful chat call → persist.
///
/// Every chat turn is pinned to the model that won the original fallback
/// race; the chain is never re-run here. Failure leaves the stored record
/// unmodified (no partial turn append).
pub struct ChatService {
    client: Arc<ProviderClient>,
    store: SessionStore,
    config: Config,
}

impl ChatService {
    #[must_use]
    pub fn new(client: Arc<ProviderClient>, store: SessionStore, config: Config) -> Self {
        Self { client, store, config }
    }

    /// Answers a follow-up question against a persisted session, appending
    /// exactly two turns on success.
    pub async fn chat(&self, session_id: &str, message: &str) -> Result<String, ServiceError> {
        let mut record = self.store.get(session_id)?;
        record.upgrade_legacy_model(&self.config.fallback_chain);

        let history = reconstruct::rebuild(&self.client, &record).await;
        tracing::info!(session_id, model = %record.resolved_model, "starting chat with preserved model");
        let answer = self
            .client
            .chat(&record.resolved_model, SYSTEM_PROMPT, &history, message)
            .await?;

        record.turns.push(ConversationTurn::user(message));
        record.turns.push(ConversationTurn::model(&answer));
        self.store.update(&record)?;
        Ok(answer)
    }
}
