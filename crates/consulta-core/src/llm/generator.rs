//! AnswerGenerator trait definition.
//!
//! The single LLM abstraction the core depends on: given a query and a block
//! of context, produce text. It serves both end-user answers and memory
//! summaries; only the prompt content differs.

use std::future::Future;

use consulta_types::llm::LlmError;

/// Trait for answer-generation backends (OpenAI-compatible APIs, test fakes).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in consulta-infra.
pub trait AnswerGenerator: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Generate a response to `query` grounded in `context`.
    fn answer(
        &self,
        query: &str,
        context: &str,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}
