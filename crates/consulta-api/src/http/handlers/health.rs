//! Health endpoint.
//!
//! GET /api/v1/health - Liveness plus index and session counts.

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// GET /api/v1/health - No auth, no envelope.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (documents, dimension) = {
        let index = state.chat.retriever().index().read().await;
        (index.len(), index.dimension())
    };

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "documents": documents,
        "dimension": dimension,
        "sessions": state.chat.sessions().len(),
    }))
}
