//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use consulta_types::error::{ChatError, EmbeddingError, IndexError, RetrievalError};
use consulta_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure while answering a question.
    Chat(ChatError),
    /// Unknown session id.
    SessionNotFound(String),
    /// Validation error.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session '{id}' not found"),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Chat(ChatError::Memory(e)) => (
                StatusCode::BAD_GATEWAY,
                "SUMMARIZATION_FAILED",
                e.to_string(),
            ),
            AppError::Chat(ChatError::Retrieval(RetrievalError::Index(
                e @ IndexError::DimensionMismatch { .. },
            ))) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INDEX_DIMENSION_MISMATCH",
                e.to_string(),
            ),
            AppError::Chat(ChatError::Retrieval(RetrievalError::Index(e))) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INDEX_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::Retrieval(RetrievalError::Embedding(
                e @ EmbeddingError::Provider(_),
            ))) => (StatusCode::BAD_GATEWAY, "EMBEDDING_FAILED", e.to_string()),
            AppError::Chat(ChatError::Retrieval(RetrievalError::Embedding(e))) => {
                (StatusCode::BAD_GATEWAY, "EMBEDDING_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::Generation(LlmError::RateLimited { .. })) => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Answer provider is rate limiting requests".to_string(),
            ),
            AppError::Chat(ChatError::Generation(e)) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
