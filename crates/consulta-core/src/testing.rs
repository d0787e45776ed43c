//! Hand-written fakes for the core's collaborator traits.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use consulta_types::error::EmbeddingError;
use tokio::sync::Notify;
use consulta_types::llm::LlmError;

use crate::llm::generator::AnswerGenerator;
use crate::retrieval::embedder::Embedder;

/// Embedder returning preset vectors per text, or a fallback vector.
pub struct FakeEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
    pub calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for FakeEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| self.vectors.get(t).cloned().unwrap_or_else(|| self.fallback.clone()))
            .collect())
    }

    fn model_name(&self) -> &str {
        "fake-embedder"
    }
}

/// Embedder that always fails.
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Provider("connection refused".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing-embedder"
    }
}

/// Generator replaying scripted replies and recording every call.
///
/// When the script runs out, replies with `default_reply`.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    default_reply: String,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new(default_reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: default_reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn then_reply(self, reply: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
        self
    }

    pub fn then_fail(self) -> Self {
        self.replies.lock().unwrap().push_back(Err(LlmError::Provider {
            message: "upstream timeout".to_string(),
        }));
        self
    }

    pub fn recorded(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl AnswerGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn answer(&self, query: &str, context: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), context.to_string()));
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.default_reply.clone()))
    }
}

/// Generator answering `"respuesta a <query>"` after yielding to the
/// scheduler a few times. Queries starting with the gated prefix wait for
/// [`GatedGenerator::open`] first.
pub struct GatedGenerator {
    gated_prefix: String,
    gate: Notify,
}

impl GatedGenerator {
    pub fn new(gated_prefix: &str) -> Self {
        Self {
            gated_prefix: gated_prefix.to_string(),
            gate: Notify::new(),
        }
    }

    pub fn open(&self) {
        self.gate.notify_one();
    }
}

impl AnswerGenerator for GatedGenerator {
    fn name(&self) -> &str {
        "gated"
    }

    async fn answer(&self, query: &str, _context: &str) -> Result<String, LlmError> {
        if query.starts_with(&self.gated_prefix) {
            self.gate.notified().await;
        }
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        Ok(format!("respuesta a {query}"))
    }
}

impl<T: Embedder> Embedder for Arc<T> {
    fn embed(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send {
        (**self).embed(texts)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

impl<T: AnswerGenerator> AnswerGenerator for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn answer(
        &self,
        query: &str,
        context: &str,
    ) -> impl Future<Output = Result<String, LlmError>> + Send {
        (**self).answer(query, context)
    }
}
