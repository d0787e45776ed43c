//! Memory summarizer for buffer eviction.
//!
//! `MemorySummarizer` condenses the memory buffer into a short text through
//! the answer generator. It reuses the generic `answer(query, context)`
//! contract: the query names the task and the context carries the
//! summarization prompt with the buffer text embedded.

use consulta_types::llm::LlmError;

use crate::llm::box_generator::BoxAnswerGenerator;

/// Query sent alongside the summarization prompt.
pub const SUMMARY_QUERY: &str = "Resumen de memoria";

/// Build the summarization prompt for the newline-joined buffer text.
pub fn build_summary_prompt(memory: &str) -> String {
    format!("Resume brevemente la siguiente memoria:\n{memory}\nResumen:")
}

/// Stateless utility for summarizing the memory buffer.
pub struct MemorySummarizer;

impl MemorySummarizer {
    /// Summarize `memory` into a trimmed text.
    ///
    /// Empty input yields an empty summary without calling the generator.
    #[tracing::instrument(
        name = "summarize_memory",
        skip(generator, memory),
        fields(
            provider = %generator.name(),
            memory_len = memory.len(),
        )
    )]
    pub async fn summarize(generator: &BoxAnswerGenerator, memory: &str) -> Result<String, LlmError> {
        if memory.trim().is_empty() {
            return Ok(String::new());
        }

        let prompt = build_summary_prompt(memory);
        let summary = generator.answer(SUMMARY_QUERY, &prompt).await?;
        Ok(summary.trim().to_string())
    }
}
