//! Serde types mirroring the provider's REST wire format.

use serde::{Deserialize, Serialize};
use vidocs_core::{AssetHandle, TurnRole};

use crate::PromptPart;

/// MIME type sent for uploaded screen recordings.
pub const VIDEO_MIME: &str = "video/webm";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<WireSystemInstruction>,
}

impl GenerateRequest {
    pub(crate) fn new(contents: Vec<WireContent>, system: &str) -> Self {
        let system_instruction = if system.is_empty() {
            None
        } else {
            Some(WireSystemInstruction { parts: vec![WirePart::text(system)] })
        };
        Self { contents, system_instruction }
    }
}

#[derive(Serialize)]
pub(crate) struct WireSystemInstruction {
    pub parts: Vec<WirePart>,
}

#[derive(Serialize)]
pub(crate) struct WireContent {
    pub role: TurnRole,
    pub parts: Vec<WirePart>,
}

impl WireContent {
    pub(crate) fn from_parts(role: TurnRole, parts: &[PromptPart]) -> Self {
        Self { role, parts: parts.iter().map(WirePart::from_prompt_part).collect() }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<WireFileData>,
}

impl WirePart {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), file_data: None }
    }

    fn from_prompt_part(part: &PromptPart) -> Self {
        match part {
            PromptPart::Text(text) => Self::text(text.clone()),
            PromptPart::Asset(handle) => Self {
                text: None,
                file_data: Some(WireFileData {
                    mime_type: VIDEO_MIME.to_owned(),
                    file_uri: handle.uri.clone(),
                }),
            },
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireFileData {
    pub mime_type: String,
    pub file_uri: String,
}

#[derive(Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<WireCandidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts, in emission order.
    pub(crate) fn first_candidate_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        Some(
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .concat(),
        )
    }
}

#[derive(Deserialize)]
pub(crate) struct WireCandidate {
    pub content: Option<WireCandidateContent>,
}

#[derive(Deserialize)]
pub(crate) struct WireCandidateContent {
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

/// Processing status of a remote asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    Processing,
    Ready,
    Failed,
}

impl AssetState {
    /// Unknown states keep the poller waiting rather than failing; the
    /// bound on the poll loop still guarantees termination.
    pub(crate) fn parse(state: &str) -> Self {
        match state {
            "ACTIVE" => Self::Ready,
            "FAILED" => Self::Failed,
            _ => Self::Processing,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct UploadResponse {
    pub file: RemoteFile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoteFile {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub state: String,
}

impl RemoteFile {
    pub(crate) fn into_handle(self) -> (AssetHandle, AssetState) {
        let state = AssetState::parse(&self.state);
        (AssetHandle { name: self.name, uri: self.uri }, state)
    }
}
