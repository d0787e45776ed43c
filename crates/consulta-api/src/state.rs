//! Application state wiring all services together.
//!
//! AppState is built once at startup and shared by the CLI commands and the
//! REST API handlers. It pins the core services to the concrete infra
//! implementations (OpenAI embeddings and chat, on-disk index).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use consulta_core::chat::service::ChatService;
use consulta_core::index::vector::{SharedIndex, VectorIndex};
use consulta_core::llm::box_generator::BoxAnswerGenerator;
use consulta_core::retrieval::box_embedder::BoxEmbedder;
use consulta_core::retrieval::retriever::Retriever;
use consulta_infra::config::{load_global_config, resolve_data_dir, resolve_path};
use consulta_infra::embedding::create_embedder;
use consulta_infra::index::store::{index_exists, load_index};
use consulta_infra::llm::{API_KEY_ENV, create_answer_generator, resolve_api_key};
use consulta_types::config::GlobalConfig;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub embedder: Arc<BoxEmbedder>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    /// Initialize the application state: read config, build the OpenAI
    /// clients and, when `restore_index` is set, load the persisted index.
    ///
    /// `consulta index` passes `false` so a corrupt index on disk never
    /// blocks the command that rebuilds it.
    pub async fn init(data_dir: Option<PathBuf>, restore_index: bool) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(resolve_data_dir);
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;

        let api_key = resolve_api_key()
            .with_context(|| format!("{API_KEY_ENV} is not set"))?;
        let embedder = create_embedder(&config.embedding, api_key.clone());
        let generator = create_answer_generator(&config.llm, &api_key);

        let index_dir = resolve_path(&data_dir, &config.index.dir);
        let index = open_index(&index_dir, restore_index).await?;

        Ok(Self::from_parts(
            config,
            data_dir,
            Arc::new(embedder),
            Arc::new(generator),
            index.shared(),
        ))
    }

    /// Assemble the state from already-built collaborators.
    pub fn from_parts(
        config: GlobalConfig,
        data_dir: PathBuf,
        embedder: Arc<BoxEmbedder>,
        generator: Arc<BoxAnswerGenerator>,
        index: SharedIndex,
    ) -> Self {
        let retriever = Retriever::new(Arc::clone(&embedder), index);
        let chat = ChatService::new(
            retriever,
            generator,
            config.memory.max_tokens,
            config.retrieval.top_k,
        );

        Self {
            config: Arc::new(config),
            data_dir,
            embedder,
            chat: Arc::new(chat),
        }
    }

    /// Directory holding the persisted index.
    pub fn index_dir(&self) -> PathBuf {
        resolve_path(&self.data_dir, &self.config.index.dir)
    }

    /// Directory scanned for source documents.
    pub fn documents_dir(&self) -> PathBuf {
        resolve_path(&self.data_dir, &self.config.index.documents_dir)
    }
}

/// The index the services start with: the persisted one when `restore` is
/// set and artifacts exist, otherwise an empty index.
async fn open_index(index_dir: &Path, restore: bool) -> anyhow::Result<VectorIndex> {
    if !restore {
        return Ok(VectorIndex::new());
    }
    if index_exists(index_dir) {
        let index = load_index(index_dir)
            .await
            .with_context(|| format!("failed to load index from {}", index_dir.display()))?;
        return Ok(index);
    }

    tracing::warn!(
        dir = %index_dir.display(),
        "no index found, answers will rely on memory only (run `consulta index`)"
    );
    Ok(VectorIndex::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use consulta_infra::index::store::{DOCUMENTS_FILE, VECTORS_FILE};
    use tempfile::TempDir;

    async fn write_corrupt_index(dir: &Path) {
        tokio::fs::write(dir.join(VECTORS_FILE), [0u8; 5]).await.unwrap();
        tokio::fs::write(dir.join(DOCUMENTS_FILE), b"{\"dimension\": 3, \"documents\": []}")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_index_fails_when_restoring() {
        let tmp = TempDir::new().unwrap();
        write_corrupt_index(tmp.path()).await;

        assert!(open_index(tmp.path(), true).await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_index_is_ignored_when_rebuilding() {
        let tmp = TempDir::new().unwrap();
        write_corrupt_index(tmp.path()).await;

        let index = open_index(tmp.path(), false).await.unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), None);
    }

    #[tokio::test]
    async fn test_missing_index_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let index = open_index(&tmp.path().join("faiss_index"), true).await.unwrap();
        assert!(index.is_empty());
    }
}
