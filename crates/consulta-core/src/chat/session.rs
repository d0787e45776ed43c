//! Per-session memory registry.
//!
//! `SessionRegistry` maps a session id to that session's `MemoryManager`.
//! Each manager sits behind its own async mutex so operations on one session
//! are serialized while different sessions proceed independently. Handles
//! are cloned out of the map immediately; a `DashMap` guard is never held
//! across an `.await`.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::llm::box_generator::BoxAnswerGenerator;
use crate::memory::manager::MemoryManager;

/// Shared handle to one session's memory.
pub type SessionMemory = Arc<Mutex<MemoryManager>>;

/// Concurrent map of session id to memory manager.
///
/// Cloning produces a shared view of the same sessions.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, SessionMemory>>,
    generator: Arc<BoxAnswerGenerator>,
    max_tokens: usize,
}

impl SessionRegistry {
    /// Create an empty registry whose managers summarize through `generator`
    /// and hold at most `max_tokens` approximate tokens.
    pub fn new(generator: Arc<BoxAnswerGenerator>, max_tokens: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            generator,
            max_tokens,
        }
    }

    /// The memory for `session_id`, created empty on first use.
    pub fn get_or_create(&self, session_id: &str) -> SessionMemory {
        if let Some(existing) = self.sessions.get(session_id) {
            return Arc::clone(existing.value());
        }

        let entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id, "creating session memory");
                Arc::new(Mutex::new(MemoryManager::new(
                    Arc::clone(&self.generator),
                    self.max_tokens,
                )))
            });
        Arc::clone(entry.value())
    }

    /// The memory for `session_id`, if the session exists.
    pub fn get(&self, session_id: &str) -> Option<SessionMemory> {
        self.sessions.get(session_id).map(|r| Arc::clone(r.value()))
    }

    /// Forget a session. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}
