//! Embedding provider implementations.

pub mod openai;

use secrecy::SecretString;

use consulta_core::retrieval::box_embedder::BoxEmbedder;
use consulta_types::config::EmbeddingConfig;

use self::openai::OpenAiEmbedder;

/// Create a [`BoxEmbedder`] from the `[embedding]` config section.
pub fn create_embedder(config: &EmbeddingConfig, api_key: SecretString) -> BoxEmbedder {
    BoxEmbedder::new(OpenAiEmbedder::new(api_key, config))
}
