//! `consulta index` - build and persist the document index.

use std::path::PathBuf;

use console::style;

use consulta_core::index::vector::VectorIndex;
use consulta_core::retrieval::retriever::Retriever;
use consulta_core::retrieval::source::DocumentSource;
use consulta_infra::index::store::save_index;
use consulta_infra::loader::DirectoryLoader;

use crate::cli::spinner;
use crate::state::AppState;

/// Load every document under `docs` (or the configured documents
/// directory), embed it into a fresh index and write it to disk.
pub async fn build_index(
    state: &AppState,
    docs: Option<PathBuf>,
    json: bool,
    progress: bool,
) -> anyhow::Result<()> {
    let root = docs.unwrap_or_else(|| state.documents_dir());
    let index_dir = state.index_dir();

    let loader = DirectoryLoader::from_config(&root, &state.config.index)?;

    let bar = progress.then(|| spinner("Loading documents..."));
    let documents = loader.load().await?;
    let loaded = documents.len();

    if let Some(p) = &bar {
        p.set_message(format!("Embedding {loaded} chunks..."));
    }

    let retriever = Retriever::new(state.embedder.clone(), VectorIndex::new().shared());
    let indexed = retriever
        .index_documents(documents, state.config.retrieval.embed_batch_size)
        .await?;

    let index = retriever.index().read().await;
    save_index(&index, &index_dir).await?;

    if let Some(p) = bar {
        p.finish_and_clear();
    }

    if json {
        let out = serde_json::json!({
            "documents_dir": root.display().to_string(),
            "index_dir": index_dir.display().to_string(),
            "documents": indexed,
            "dimension": index.dimension(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if !progress {
        return Ok(());
    } else if indexed == 0 {
        println!(
            "  {} No documents found under {}",
            style("!").yellow().bold(),
            style(root.display()).dim()
        );
    } else {
        println!(
            "  {} Indexed {} chunks from {}",
            style("✓").green().bold(),
            style(indexed).cyan(),
            style(root.display()).dim()
        );
        println!("  Saved to {}", style(index_dir.display()).dim());
    }

    Ok(())
}
