//! Typed API error for HTTP handlers.
//!
//! Converts orchestration errors into proper HTTP responses with JSON body
//! and status codes. Handlers return `Result<Json<T>, ApiError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use vidocs_core::ALL_MODELS_FAILED_DETAIL;
use vidocs_service::ServiceError;

/// API error with HTTP status code and human-readable detail.
///
/// Converts to JSON response: `{"error": "message"}`. Fatal orchestration
/// failures carry their original detail text to the caller.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — invalid input from caller.
    BadRequest(String),
    /// 404 Not Found — requested session doesn't exist.
    NotFound(String),
    /// 500 Internal Server Error — orchestration failure with detail.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_not_found() {
            Self::NotFound("Session not found".to_owned())
        } else if err.is_exhausted() {
            Self::Internal(ALL_MODELS_FAILED_DETAIL.to_owned())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<vidocs_storage::StorageError> for ApiError {
    fn from(err: vidocs_storage::StorageError) -> Self {
        if err.is_not_found() {
            Self::NotFound("Session not found".to_owned())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidocs_provider::ProviderError;
    use vidocs_storage::StorageError;

    #[test]
    fn exhausted_chain_maps_to_500_with_fixed_detail() {
        let err: ApiError = ServiceError::from(ProviderError::AllModelsExhausted).into();
        match err {
            ApiError::Internal(msg) => assert_eq!(msg, ALL_MODELS_FAILED_DETAIL),
            other => panic!("expected Internal, got {other:?}"),
        }
    }

    #[test]
    fn missing_session_maps_to_404() {
        let err: ApiError =
            ServiceError::from(StorageError::NotFound { id: "x".to_owned() }).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn provider_failure_carries_detail_text() {
        let err: ApiError = ServiceError::from(ProviderError::AssetProcessingFailed(
            "asset files/x reported terminal failure".to_owned(),
        ))
        .into();
        match err {
            ApiError::Internal(msg) => assert!(msg.contains("files/x")),
            other => panic!("expected Internal, got {other:?}"),
        }
    }
}
