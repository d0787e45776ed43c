//! Query-to-context retrieval.
//!
//! `Retriever` embeds a text query with the configured embedder, searches
//! the shared vector index, and formats the hits into a source-attributed
//! context block for the answer generator.

use std::sync::Arc;

use consulta_types::document::{Document, ScoredDocument};
use consulta_types::error::{EmbeddingError, RetrievalError};

use crate::index::vector::SharedIndex;

use super::box_embedder::BoxEmbedder;

/// Placeholder shown when a document carries no `source` metadata.
const UNKNOWN_SOURCE: &str = "desconocido";

/// Turns text queries into ranked documents from the vector index.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<BoxEmbedder>,
    index: SharedIndex,
}

impl Retriever {
    pub fn new(embedder: Arc<BoxEmbedder>, index: SharedIndex) -> Self {
        Self { embedder, index }
    }

    /// The shared index this retriever searches.
    pub fn index(&self) -> &SharedIndex {
        &self.index
    }

    pub fn embedder(&self) -> &BoxEmbedder {
        &self.embedder
    }

    /// Return the `top_k` documents nearest to `query`.
    ///
    /// An empty index short-circuits to no results without calling the
    /// embedder. A dimension drift between the embedder and the index
    /// surfaces as `IndexError::DimensionMismatch`.
    #[tracing::instrument(name = "retrieve", skip(self, query), fields(query_len = query.len()))]
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, RetrievalError> {
        if self.index.read().await.is_empty() {
            tracing::debug!("index is empty, skipping query embedding");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_query(query).await?;

        let results = self.index.read().await.search(&query_embedding, top_k)?;
        tracing::debug!(hits = results.len(), "retrieved documents");
        Ok(results)
    }

    /// Embed `documents` and append them to the index.
    ///
    /// Embeddings are requested in batches of `batch_size`. The index is
    /// only written once every batch has succeeded, so a failed call leaves
    /// it unchanged. Returns the number of documents inserted.
    #[tracing::instrument(name = "index_documents", skip(self, documents), fields(count = documents.len()))]
    pub async fn index_documents(
        &self,
        documents: Vec<Document>,
        batch_size: usize,
    ) -> Result<usize, RetrievalError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let batch_size = batch_size.max(1);
        let mut embeddings = Vec::with_capacity(documents.len());

        for batch in documents.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|d| d.content.clone()).collect();
            let vectors = self.embedder.embed(&texts).await?;
            if vectors.len() != texts.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: texts.len(),
                    actual: vectors.len(),
                }
                .into());
            }
            embeddings.extend(vectors);
        }

        let count = documents.len();
        self.index.write().await.add(embeddings, documents)?;
        tracing::info!(count, model = self.embedder.model_name(), "indexed documents");
        Ok(count)
    }
}

/// Render search hits as a source-attributed context block.
///
/// Each hit becomes `"[Fuente: <source> | Score: <distance>]\n<content>\n\n"`
/// with the distance printed to four decimals; the result has trailing
/// whitespace trimmed. No hits yields an empty string.
pub fn format_context(results: &[ScoredDocument]) -> String {
    let context: String = results
        .iter()
        .map(|hit| {
            let source = hit.document.source().unwrap_or(UNKNOWN_SOURCE);
            format!(
                "[Fuente: {source} | Score: {:.4}]\n{}\n\n",
                hit.distance,
                hit.document.content.trim()
            )
        })
        .collect();
    context.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::vector::VectorIndex;
    use crate::testing::{FailingEmbedder, FakeEmbedder};
    use consulta_types::error::IndexError;

    fn scored(content: &str, source: Option<&str>, distance: f32) -> ScoredDocument {
        let mut document = Document::new(content);
        if let Some(source) = source {
            document = document.with_source(source);
        }
        ScoredDocument { document, distance }
    }

    fn retriever_with(embedder: FakeEmbedder) -> (Retriever, Arc<FakeEmbedder>) {
        let embedder = Arc::new(embedder);
        let retriever = Retriever::new(
            Arc::new(BoxEmbedder::new(Arc::clone(&embedder))),
            VectorIndex::new().shared(),
        );
        (retriever, embedder)
    }

    fn unit_docs() -> Vec<Document> {
        vec![
            Document::new("alfa").with_source("A"),
            Document::new("beta").with_source("B"),
            Document::new("gamma").with_source("C"),
        ]
    }

    fn unit_embedder() -> FakeEmbedder {
        FakeEmbedder::new(vec![0.0, 0.0, 0.0])
            .with("alfa", vec![1.0, 0.0, 0.0])
            .with("beta", vec![0.0, 1.0, 0.0])
            .with("gamma", vec![0.0, 0.0, 1.0])
            .with("¿algo parecido a alfa?", vec![0.9, 0.1, 0.0])
    }

    #[test]
    fn test_format_context_empty() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn test_format_context_blocks() {
        let results = vec![
            scored("  primer fragmento \n", Some("manual.md"), 0.02),
            scored("segundo", None, 1.23456),
        ];
        assert_eq!(
            format_context(&results),
            "[Fuente: manual.md | Score: 0.0200]\nprimer fragmento\n\n\
             [Fuente: desconocido | Score: 1.2346]\nsegundo"
        );
    }

    #[test]
    fn test_format_context_has_no_trailing_blank_line() {
        let out = format_context(&[scored("texto\n\n\n", Some("a"), 0.0)]);
        assert!(!out.ends_with('\n'));
        assert!(out.ends_with("texto"));
    }

    #[tokio::test]
    async fn test_retrieve_on_empty_index_skips_embedding() {
        let (retriever, embedder) = retriever_with(FakeEmbedder::new(vec![1.0]));
        let results = retriever.retrieve("cualquier cosa", 3).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(embedder.call_count(), 0);
        assert_eq!(format_context(&results), "");
    }

    #[tokio::test]
    async fn test_index_then_retrieve_nearest() {
        let (retriever, _) = retriever_with(unit_embedder());
        let inserted = retriever.index_documents(unit_docs(), 2).await.unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(retriever.index().read().await.len(), 3);

        let results = retriever.retrieve("¿algo parecido a alfa?", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.source(), Some("A"));
        assert!((results[0].distance - 0.02).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_index_documents_batches_requests() {
        let (retriever, embedder) = retriever_with(unit_embedder());
        retriever.index_documents(unit_docs(), 2).await.unwrap();
        assert_eq!(embedder.call_count(), 2);
    }

    #[tokio::test]
    async fn test_retrieve_propagates_dimension_drift() {
        let (retriever, _) = retriever_with(unit_embedder().with("drift", vec![1.0, 0.0]));
        retriever.index_documents(unit_docs(), 8).await.unwrap();

        let err = retriever.retrieve("drift", 2).await.unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::Index(IndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(retriever.index().read().await.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_embedding_leaves_index_untouched() {
        let retriever = Retriever::new(
            Arc::new(BoxEmbedder::new(FailingEmbedder)),
            VectorIndex::new().shared(),
        );
        let err = retriever.index_documents(unit_docs(), 8).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
        assert!(retriever.index().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_other_dimension_embedder_is_rejected() {
        let (retriever, _) = retriever_with(unit_embedder());
        retriever.index_documents(unit_docs(), 8).await.unwrap();

        let five_dim = Retriever::new(
            Arc::new(BoxEmbedder::new(FakeEmbedder::new(vec![0.5; 5]))),
            retriever.index().clone(),
        );
        let err = five_dim
            .index_documents(vec![Document::new("delta")], 8)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::Index(IndexError::DimensionMismatch { .. })
        ));
        assert_eq!(retriever.index().read().await.len(), 3);
    }
}
