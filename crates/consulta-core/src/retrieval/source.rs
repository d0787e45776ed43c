//! Document source trait.
//!
//! A document source supplies the corpus that gets embedded into the
//! vector index at startup. Implementations (e.g., a directory loader)
//! live in consulta-infra.

use std::future::Future;

use consulta_types::document::Document;
use consulta_types::error::LoaderError;

/// Trait for anything that can produce documents to index.
pub trait DocumentSource: Send + Sync {
    /// Load every document this source knows about, in a stable order.
    fn load(&self) -> impl Future<Output = Result<Vec<Document>, LoaderError>> + Send;
}
