//! Embedder trait for text-to-vector conversion.
//!
//! Defines the interface for embedding documents and queries for semantic
//! search. Implementations (e.g., OpenAI embeddings) live in consulta-infra.

use std::future::Future;

use consulta_types::error::EmbeddingError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// A given model configuration must return vectors of a stable dimension.
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors, one vector per input.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    /// Embed a single query string.
    fn embed_query(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<f32>, EmbeddingError>> + Send {
        let texts = vec![text.to_string()];
        async move {
            let mut vectors = self.embed(&texts).await?;
            if vectors.len() > 1 {
                return Err(EmbeddingError::CountMismatch {
                    expected: 1,
                    actual: vectors.len(),
                });
            }
            vectors.pop().ok_or(EmbeddingError::EmptyResponse)
        }
    }

    /// The model name used for embeddings (e.g., "text-embedding-3-small").
    fn model_name(&self) -> &str;
}
