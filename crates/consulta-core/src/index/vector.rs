//! Exact nearest-neighbor vector index.
//!
//! Embeddings are stored row-major in one flat `f32` buffer alongside a
//! parallel `Vec<Document>`: row `i` of the buffer always belongs to
//! document `i`. Search is a linear scan computing squared Euclidean
//! distance against every row.

use std::cmp::Ordering;
use std::sync::Arc;

use consulta_types::document::{Document, ScoredDocument};
use consulta_types::error::IndexError;
use tokio::sync::RwLock;

/// Vector index shared between the retriever and whoever populates it.
///
/// Readers (`search`) proceed concurrently; `add` takes the write half.
pub type SharedIndex = Arc<RwLock<VectorIndex>>;

/// In-memory exact-search index over document embeddings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorIndex {
    dimension: Option<usize>,
    vectors: Vec<f32>,
    documents: Vec<Document>,
}

impl VectorIndex {
    /// Create an empty index. The dimension is fixed by the first `add`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh index for shared use.
    pub fn shared(self) -> SharedIndex {
        Arc::new(RwLock::new(self))
    }

    /// Rebuild an index from a flat row-major vector buffer.
    ///
    /// Used when restoring persisted state. Fails if the buffer does not
    /// hold exactly one row of `dimension` components per document.
    pub fn from_parts(
        dimension: Option<usize>,
        vectors: Vec<f32>,
        documents: Vec<Document>,
    ) -> Result<Self, IndexError> {
        let expected_len = match dimension {
            Some(0) => return Err(IndexError::EmptyEmbedding),
            Some(dim) => documents.len().checked_mul(dim).ok_or_else(|| {
                IndexError::Persistence(format!(
                    "dimension {dim} overflows the vector buffer for {} documents",
                    documents.len()
                ))
            })?,
            None => 0,
        };

        if vectors.len() != expected_len || (dimension.is_none() && !documents.is_empty()) {
            let rows = match dimension {
                Some(dim) => vectors.len() / dim,
                None => 0,
            };
            return Err(IndexError::Persistence(format!(
                "vector count {rows} does not match document count {}",
                documents.len()
            )));
        }

        Ok(Self {
            dimension,
            vectors,
            documents,
        })
    }

    /// Embedding dimension, once established.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Stored documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The flat row-major embedding buffer.
    pub fn raw_vectors(&self) -> &[f32] {
        &self.vectors
    }

    /// Append embeddings and their documents.
    ///
    /// The whole batch is validated before anything is written, so a
    /// rejected call leaves the index untouched.
    pub fn add(
        &mut self,
        embeddings: Vec<Vec<f32>>,
        documents: Vec<Document>,
    ) -> Result<(), IndexError> {
        if embeddings.len() != documents.len() {
            return Err(IndexError::LengthMismatch {
                embeddings: embeddings.len(),
                documents: documents.len(),
            });
        }

        let Some(first) = embeddings.first() else {
            return Ok(());
        };

        let dimension = self.dimension.unwrap_or(first.len());
        if dimension == 0 {
            return Err(IndexError::EmptyEmbedding);
        }

        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimension) {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        self.vectors.reserve(embeddings.len() * dimension);
        for embedding in &embeddings {
            self.vectors.extend_from_slice(embedding);
        }
        self.documents.extend(documents);
        self.dimension = Some(dimension);

        tracing::debug!(
            added = embeddings.len(),
            total = self.documents.len(),
            dimension,
            "added embeddings to index"
        );

        Ok(())
    }

    /// Return the `min(k, len)` documents nearest to `query`.
    ///
    /// Results are ordered by ascending squared Euclidean distance; equal
    /// distances keep insertion order. An empty index yields no results.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredDocument>, IndexError> {
        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        if self.documents.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .chunks_exact(dimension)
            .enumerate()
            .map(|(position, row)| (squared_l2(query, row), position))
            .collect();

        scored.sort_by(|a, b| match a.0.total_cmp(&b.0) {
            Ordering::Equal => a.1.cmp(&b.1),
            other => other,
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(distance, position)| ScoredDocument {
                document: self.documents[position].clone(),
                distance,
            })
            .collect())
    }
}

/// Squared Euclidean distance. Both slices must have the same length.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
