//! Global configuration types for Consulta.
//!
//! `GlobalConfig` represents the top-level `config.toml` in the data
//! directory. Every section and field has a default, so an empty file (or
//! no file at all) yields a working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::GenerationSettings;

/// Top-level configuration, loaded from `~/.consulta/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents retrieved per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Texts per embedding request when building the index.
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

fn default_top_k() -> usize {
    3
}

fn default_embed_batch_size() -> usize {
    64
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}

/// Conversational memory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Word-count capacity before the buffer summarizes itself.
    #[serde(default = "default_memory_max_tokens")]
    pub max_tokens: usize,
}

fn default_memory_max_tokens() -> usize {
    200
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_memory_max_tokens(),
        }
    }
}

/// Document index settings. Relative paths resolve against the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the persisted index artifacts.
    #[serde(default = "default_index_dir")]
    pub dir: PathBuf,
    /// Directory scanned for source documents.
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,
    /// Target chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Emit one document per file instead of chunking.
    #[serde(default)]
    pub split_by_file: bool,
    /// File extensions (without the dot) picked up by the loader.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("faiss_index")
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("raw")
}

fn default_chunk_size() -> usize {
    300
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string(), "md".to_string()]
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: default_index_dir(),
            documents_dir: default_documents_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            split_by_file: false,
            extensions: default_extensions(),
        }
    }
}

/// Answer generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_max_tokens() -> u32 {
    500
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            temperature: 0.0,
            max_tokens: default_llm_max_tokens(),
            base_url: default_base_url(),
        }
    }
}

impl LlmConfig {
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            base_url: default_base_url(),
        }
    }
}
