//! Request/response types for the HTTP API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub session_id: String,
    pub title: String,
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: String,
    pub title: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}
