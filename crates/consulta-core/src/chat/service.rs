//! Chat service answering questions with retrieval plus session memory.
//!
//! `ChatService` runs one conversational turn end to end:
//!
//! 1. record the user's question in the session memory
//! 2. retrieve and format the nearest documents
//! 3. combine retrieved context with the memory context
//! 4. ask the answer generator
//! 5. record the answer in memory
//! 6. take the pending summary, if eviction produced one during the turn
//!
//! The session's memory lock is held for the whole turn, so concurrent
//! requests on the same session queue behind each other.

use std::sync::Arc;

use consulta_types::document::{Document, ScoredDocument, TurnRole};
use consulta_types::error::ChatError;
use serde::Serialize;

use crate::chat::session::SessionRegistry;
use crate::llm::box_generator::BoxAnswerGenerator;
use crate::retrieval::retriever::{Retriever, format_context};

/// Outcome of one question.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub answer: String,
    pub sources: Vec<ScoredDocument>,
    /// A memory summary produced during this turn, surfaced exactly once.
    pub summary: Option<String>,
}

/// Orchestrates retrieval, answer generation and per-session memory.
pub struct ChatService {
    retriever: Retriever,
    generator: Arc<BoxAnswerGenerator>,
    sessions: SessionRegistry,
    top_k: usize,
}

impl ChatService {
    pub fn new(
        retriever: Retriever,
        generator: Arc<BoxAnswerGenerator>,
        max_tokens: usize,
        top_k: usize,
    ) -> Self {
        let sessions = SessionRegistry::new(Arc::clone(&generator), max_tokens);
        Self {
            retriever,
            generator,
            sessions,
            top_k,
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Answer `question` within `session_id`'s conversation.
    #[tracing::instrument(name = "chat_turn", skip_all, fields(session_id = %session_id))]
    pub async fn ask(&self, session_id: &str, question: &str) -> Result<ChatReply, ChatError> {
        let memory = self.sessions.get_or_create(session_id);
        let mut memory = memory.lock().await;

        memory.add_turn(Document::turn(TurnRole::User, question)).await?;

        let sources = self.retriever.retrieve(question, self.top_k).await?;
        let full_context = format!("{}\n{}", format_context(&sources), memory.get_context());

        let answer = self.generator.answer(question, &full_context).await?;

        memory
            .add_turn(Document::turn(TurnRole::Assistant, &answer))
            .await?;
        let summary = memory.take_pending_summary();

        tracing::info!(
            sources = sources.len(),
            memory_tokens = memory.token_count(),
            summarized = summary.is_some(),
            "answered question"
        );

        Ok(ChatReply {
            answer,
            sources,
            summary,
        })
    }

    /// Current memory context of a session, `None` if it does not exist.
    pub async fn memory_context(&self, session_id: &str) -> Option<String> {
        let memory = self.sessions.get(session_id)?;
        let context = memory.lock().await.get_context();
        Some(context)
    }

    /// Forget a session's memory. Returns whether the session existed.
    pub fn reset(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id);
        if removed {
            tracing::info!(session_id, "session reset");
        }
        removed
    }
}
