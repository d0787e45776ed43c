//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions/{id}/ask     - Ask a question within a session
//! - GET    /api/v1/sessions/{id}/context - Current memory context
//! - DELETE /api/v1/sessions/{id}         - Forget a session's memory
//!
//! Sessions are created implicitly by their first question.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use consulta_core::chat::service::ChatReply;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for asking a question.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// One retrieved document in an answer.
#[derive(Debug, Serialize)]
pub struct SourceView {
    pub source: Option<String>,
    pub distance: f32,
    pub content: String,
}

/// Response body for an answered question.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: String,
    pub answer: String,
    pub sources: Vec<SourceView>,
    /// Memory summary produced during this turn, present at most once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AskResponse {
    fn from_reply(session_id: String, reply: ChatReply) -> Self {
        let sources = reply
            .sources
            .into_iter()
            .map(|hit| SourceView {
                source: hit.document.source().map(str::to_string),
                distance: hit.distance,
                content: hit.document.content,
            })
            .collect();

        Self {
            session_id,
            answer: reply.answer,
            sources,
            summary: reply.summary,
        }
    }
}

/// POST /api/v1/sessions/{id}/ask - Answer a question.
pub async fn ask(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<AskRequest>,
) -> Result<Json<ApiResponse<AskResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question must not be empty".to_string()));
    }

    let reply = state.chat.ask(&session_id, question).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        AskResponse::from_reply(session_id.clone(), reply),
        request_id,
        elapsed,
    )
    .with_link("context", &format!("/api/v1/sessions/{session_id}/context"));

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/context - Current memory context.
pub async fn get_context(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let memory = state
        .chat
        .sessions()
        .get(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;

    let data = {
        let memory = memory.lock().await;
        serde_json::json!({
            "session_id": session_id,
            "context": memory.get_context(),
            "token_count": memory.token_count(),
            "max_tokens": memory.max_tokens(),
        })
    };

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}/context"));

    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/{id} - Forget a session's memory.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if !state.chat.reset(&session_id) {
        return Err(AppError::SessionNotFound(session_id));
    }

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "session_id": session_id}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
