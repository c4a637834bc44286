use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use vidocs_core::{SessionRecord, DEFAULT_LANGUAGE};

use crate::api_error::ApiError;
use crate::api_types::{AnalyzeResponse, ChatRequest, ChatResponse, HistoryItem, StatusResponse};
use crate::AppState;

pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: format!("vidocs backend is running (v{})", env!("CARGO_PKG_VERSION")),
    })
}

/// `POST /analyze` — multipart upload of a screen recording plus an
/// optional target language, answered with the persisted session.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut video: Option<Vec<u8>> = None;
    let mut language = DEFAULT_LANGUAGE.to_owned();

    while let Some(field) =
        multipart.next_field().await.map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("file") => {
                let bytes =
                    field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
                video = Some(bytes.to_vec());
            },
            Some("language") => {
                language = field.text().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
            },
            _ => {},
        }
    }

    let video = video.ok_or_else(|| ApiError::BadRequest("missing 'file' part".to_owned()))?;
    tracing::info!(bytes = video.len(), %language, "received video for analysis");

    let outcome = state.docs.analyze(video, &language).await?;
    Ok(Json(AnalyzeResponse {
        session_id: outcome.session_id,
        title: outcome.title,
        markdown: outcome.markdown,
    }))
}

/// `GET /history` — session summaries, newest first.
pub async fn history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let summaries = state.store.list_all()?;
    let items = summaries
        .into_iter()
        .map(|s| HistoryItem { id: s.id, title: s.title, timestamp: s.timestamp.to_rfc3339() })
        .collect();
    Ok(Json(items))
}

/// `GET /history/{id}` — full session record.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionRecord>, ApiError> {
    let record = state.store.get(&id)?;
    Ok(Json(record))
}

/// `POST /chat` — follow-up question against a persisted session.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let answer = state.chat.chat(&req.session_id, &req.message).await?;
    Ok(Json(ChatResponse { answer }))
}
