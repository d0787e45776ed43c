//! Bounded conversational memory with eviction-by-summarization.
//!
//! The buffer holds role-tagged turns and an approximate token count (the
//! total whitespace-delimited word count of its contents, 1 word ~ 1 token).
//! When an append pushes the count past `max_tokens`, the whole buffer is
//! collapsed into a single summary document, which is also parked in a
//! single-slot "pending summary" so the caller can surface it exactly once.
//!
//! `add_turn` is all-or-nothing. The candidate buffer is built on the side
//! and committed only after the summarizer (if needed) has returned a usable
//! summary, so a failed or cancelled summarization leaves the manager
//! exactly as it was before the call.

use std::sync::Arc;

use consulta_types::document::Document;
use consulta_types::error::MemoryError;

use crate::llm::box_generator::BoxAnswerGenerator;

use super::summarizer::MemorySummarizer;

/// Which of the two buffer shapes the manager is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryState {
    /// Zero or more raw turns, no summary.
    Accumulating,
    /// Led by the most recent summary, possibly followed by newer turns.
    Summarized,
}

/// Per-session bounded memory buffer.
pub struct MemoryManager {
    generator: Arc<BoxAnswerGenerator>,
    buffer: Vec<Document>,
    token_count: usize,
    max_tokens: usize,
    pending_summary: Option<Document>,
}

impl MemoryManager {
    pub fn new(generator: Arc<BoxAnswerGenerator>, max_tokens: usize) -> Self {
        Self {
            generator,
            buffer: Vec::new(),
            token_count: 0,
            max_tokens,
            pending_summary: None,
        }
    }

    /// Append a turn, summarizing the buffer if it overflows.
    ///
    /// On `SummarizationFailure` neither the buffer nor the pending slot is
    /// changed, and `doc` is not retained.
    pub async fn add_turn(&mut self, doc: Document) -> Result<(), MemoryError> {
        let mut candidate = self.buffer.clone();
        candidate.push(doc);
        let token_count = count_tokens(&candidate);

        if token_count <= self.max_tokens {
            self.buffer = candidate;
            self.token_count = token_count;
            return Ok(());
        }

        tracing::debug!(
            token_count,
            max_tokens = self.max_tokens,
            turns = candidate.len(),
            "memory overflow, summarizing"
        );

        let summary_text = MemorySummarizer::summarize(&self.generator, &join_contents(&candidate))
            .await
            .map_err(|e| MemoryError::SummarizationFailure(e.to_string()))?;

        if summary_text.is_empty() {
            tracing::warn!("summarizer returned an empty summary, memory left unchanged");
            return Err(MemoryError::SummarizationFailure(
                "summarizer returned an empty summary".to_string(),
            ));
        }

        let summary = Document::memory_summary(summary_text);
        self.token_count = summary.word_count();
        self.buffer = vec![summary.clone()];
        self.pending_summary = Some(summary);

        tracing::info!(
            evicted_tokens = token_count,
            summary_tokens = self.token_count,
            "memory summarized"
        );
        Ok(())
    }

    /// All buffer contents, newline-joined in order.
    pub fn get_context(&self) -> String {
        join_contents(&self.buffer)
    }

    /// Take the unseen summary, if any, clearing the slot.
    pub fn take_pending_summary(&mut self) -> Option<String> {
        self.pending_summary.take().map(|doc| doc.content)
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn turns(&self) -> &[Document] {
        &self.buffer
    }

    pub fn state(&self) -> MemoryState {
        match self.buffer.first() {
            Some(doc) if doc.is_memory_summary() => MemoryState::Summarized,
            _ => MemoryState::Accumulating,
        }
    }

    /// Drop every turn and any pending summary.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.token_count = 0;
        self.pending_summary = None;
    }
}

fn count_tokens(docs: &[Document]) -> usize {
    docs.iter().map(Document::word_count).sum()
}

fn join_contents(docs: &[Document]) -> String {
    docs.iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
