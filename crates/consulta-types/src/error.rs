use thiserror::Error;

use crate::llm::LlmError;

/// Errors from vector index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("length mismatch: {embeddings} embeddings for {documents} documents")]
    LengthMismatch { embeddings: usize, documents: usize },

    #[error("embeddings must have at least one component")]
    EmptyEmbedding,

    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Errors from embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider error: {0}")]
    Provider(String),

    #[error("embedding provider returned no vectors")]
    EmptyResponse,

    #[error("embedding provider returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },
}

/// Errors from the bounded conversational memory.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("summarization failed: {0}")]
    SummarizationFailure(String),
}

/// Errors surfaced by the retriever.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Errors surfaced by one question/answer exchange.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error("answer generation failed: {0}")]
    Generation(#[from] LlmError),
}

/// Errors from document sources.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("document directory not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid chunking configuration: {0}")]
    InvalidConfig(String),
}
