//! Conversation reconstruction.
//!
//! A persisted session never stores the provider-shaped history; it is
//! rebuilt from the record on every chat turn, so changes to the
//! reconstruction logic apply retroactively to old sessions.

use vidocs_core::{AssetHandle, SessionRecord, TurnRole, GENERATION_INSTRUCTION};
use vidocs_provider::{HistoryTurn, PromptPart, ProviderClient};

/// Rebuilds the ordered history for a stateful chat call.
///
/// Attempts to re-resolve the stored asset handle first; provider-side
/// expiry is expected and degrades the history to text-only rather than
/// failing the chat turn.
pub async fn rebuild(client: &ProviderClient, record: &SessionRecord) -> Vec<HistoryTurn> {
    let asset = match &record.asset {
        Some(handle) => match client.asset_state(&handle.name).await {
            Ok((resolved, _)) => Some(resolved),
            Err(e) => {
                tracing::warn!(
                    session_id = %record.id,
                    asset = %handle.name,
                    error = %e,
                    "could not re-resolve remote asset (maybe expired), continuing text-only"
                );
                None
            },
        },
        None => None,
    };
    assemble_history(record, asset)
}

/// Deterministic assembly of the history turns.
///
/// 1. Synthetic user turn: the original generation request, with the
///    re-resolved asset reference first when available.
/// 2. Synthetic model turn: the stored markdown verbatim.
/// 3. Stored turns appended in insertion order, role and content verbatim.
pub fn assemble_history(record: &SessionRecord, asset: Option<AssetHandle>) -> Vec<HistoryTurn> {
    let mut first_parts = Vec::new();
    if let Some(handle) = asset {
        first_parts.push(PromptPart::Asset(handle));
    }
    first_parts.push(PromptPart::Text(GENERATION_INSTRUCTION.to_owned()));

    let mut history = vec![
        HistoryTurn::new(TurnRole::User, first_parts),
        HistoryTurn::new(TurnRole::Model, vec![PromptPart::Text(record.markdown.clone())]),
    ];
    for turn in &record.turns {
        history.push(HistoryTurn::new(turn.role, vec![PromptPart::Text(turn.content.clone())]));
    }
    history
}
