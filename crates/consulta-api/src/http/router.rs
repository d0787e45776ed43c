//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/sessions/{id}/ask", post(handlers::session::ask))
        .route("/sessions/{id}/context", get(handlers::session::get_context))
        .route("/sessions/{id}", delete(handlers::session::delete_session));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use consulta_core::index::vector::VectorIndex;
    use consulta_core::llm::box_generator::BoxAnswerGenerator;
    use consulta_core::llm::generator::AnswerGenerator;
    use consulta_core::retrieval::box_embedder::BoxEmbedder;
    use consulta_core::retrieval::embedder::Embedder;
    use consulta_types::config::GlobalConfig;
    use consulta_types::document::Document;
    use consulta_types::error::EmbeddingError;
    use consulta_types::llm::LlmError;

    use super::*;

    /// Embeds every text as a 2-d vector keyed on whether it mentions "horario".
    struct KeywordEmbedder;

    impl Embedder for KeywordEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains("horario") {
                        vec![1.0, 0.0]
                    } else {
                        vec![0.0, 1.0]
                    }
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "keyword"
        }
    }

    /// Echoes a fixed answer, or a summary when asked for one.
    struct FixedGenerator;

    impl AnswerGenerator for FixedGenerator {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn answer(&self, query: &str, _context: &str) -> Result<String, LlmError> {
            if query == "Resumen de memoria" {
                Ok("Resumen de la charla".to_string())
            } else {
                Ok("Abrimos de 9 a 18".to_string())
            }
        }
    }

    async fn test_state(max_tokens: usize) -> AppState {
        let mut config = GlobalConfig::default();
        config.memory.max_tokens = max_tokens;

        let mut index = VectorIndex::new();
        index
            .add(
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                vec![
                    Document::new("El horario es de 9 a 18.").with_source("horario.md"),
                    Document::new("Los envíos tardan tres días.").with_source("envios.md"),
                ],
            )
            .unwrap();

        AppState::from_parts(
            config,
            PathBuf::from("/tmp/consulta-test"),
            Arc::new(BoxEmbedder::new(KeywordEmbedder)),
            Arc::new(BoxAnswerGenerator::new(FixedGenerator)),
            index.shared(),
        )
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn ask_request(session: &str, question: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{session}/ask"))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "question": question }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state(200).await);
        let response = router
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["documents"], 2);
        assert_eq!(json["dimension"], 2);
    }

    #[tokio::test]
    async fn test_ask_returns_answer_and_sources() {
        let router = build_router(test_state(200).await);
        let response = router
            .oneshot(ask_request("s1", "¿Cuál es el horario?"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["answer"], "Abrimos de 9 a 18");
        assert_eq!(json["data"]["sources"][0]["source"], "horario.md");
        assert_eq!(json["data"]["sources"][0]["distance"], 0.0);
        assert!(json["data"].get("summary").is_none());
    }

    #[tokio::test]
    async fn test_ask_surfaces_summary_on_overflow() {
        let router = build_router(test_state(5).await);
        let response = router
            .oneshot(ask_request("s1", "¿Cuál es el horario?"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["summary"], "Resumen de la charla");
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected() {
        let router = build_router(test_state(200).await);
        let response = router.oneshot(ask_request("s1", "   ")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_context_and_delete_lifecycle() {
        let router = build_router(test_state(200).await);

        let missing = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sessions/s1/context")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        router
            .clone()
            .oneshot(ask_request("s1", "hola"))
            .await
            .unwrap();

        let context = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sessions/s1/context")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(context.status(), StatusCode::OK);
        let json = body_json(context).await;
        assert_eq!(json["data"]["context"], "Usuario: hola\nChatbot: Abrimos de 9 a 18");

        let deleted = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/sessions/s1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);

        let again = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/sessions/s1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }
}
