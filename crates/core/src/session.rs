use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::LEGACY_MODEL_SENTINEL;

/// Opaque reference to a binary uploaded to the remote provider.
///
/// Valid until provider-side expiry; expiry is expected and tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHandle {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One role-tagged message in a session's chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: TurnRole::User, content: content.into() }
    }

    #[must_use]
    pub fn model(content: impl Into<String>) -> Self {
        Self { role: TurnRole::Model, content: content.into() }
    }
}

/// The durable unit representing one documentation generation plus its
/// follow-up chat conversation.
///
/// `id`, `created_at`, `markdown` and `resolved_model` are immutable after
/// creation. `turns` is append-only and grows by exactly two entries per
/// successful chat call; insertion order is the canonical conversation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub markdown: String,
    #[serde(default)]
    pub asset: Option<AssetHandle>,
    /// Model identifier that produced `markdown`; pins all chat turns.
    #[serde(default)]
    pub resolved_model: String,
    #[serde(default)]
    pub turns: Vec<ConversationTurn>,
}

impl SessionRecord {
    /// Upgrades records written before real-model persistence existed.
    ///
    /// Records carrying the legacy sentinel (or no model at all) are pinned
    /// to the first entry of the current fallback chain. Returns whether a
    /// substitution happened.
    pub fn upgrade_legacy_model(&mut self, fallback_chain: &[String]) -> bool {
        if self.resolved_model != LEGACY_MODEL_SENTINEL && !self.resolved_model.is_empty() {
            return false;
        }
        let Some(replacement) = fallback_chain.first() else {
            return false;
        };
        tracing::info!(
            session_id = %self.id,
            old = %self.resolved_model,
            new = %replacement,
            "legacy session detected, substituting current model"
        );
        self.resolved_model = replacement.clone();
        true
    }
}

/// Listing projection of a session: no markdown, no chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}
