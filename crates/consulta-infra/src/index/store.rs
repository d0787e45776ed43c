//! On-disk persistence for the vector index.
//!
//! Directory layout:
//! ```text
//! {dir}/
//!   index.bin        raw little-endian f32 vectors, row-major
//!   documents.json   {"dimension": 3, "documents": [...]}
//! ```
//!
//! Both artifacts must be present and agree on the row count for a load to
//! succeed. A save writes both artifacts to temporary files before renaming
//! either into place, so a failed write never touches the previous index.
//! The only window left is between the two renames: a crash there pairs the
//! new vectors with the old documents, which a load rejects unless the row
//! count happens to be unchanged.

use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use consulta_core::index::vector::VectorIndex;
use consulta_types::document::Document;
use consulta_types::error::IndexError;
use serde::{Deserialize, Serialize};

/// Binary vector buffer artifact.
pub const VECTORS_FILE: &str = "index.bin";

/// Document metadata artifact.
pub const DOCUMENTS_FILE: &str = "documents.json";

const F32_BYTES: usize = std::mem::size_of::<f32>();

#[derive(Serialize, Deserialize)]
struct DocumentsArtifact {
    dimension: Option<usize>,
    documents: Vec<Document>,
}

/// Whether `dir` holds both index artifacts.
pub fn index_exists(dir: &Path) -> bool {
    dir.join(VECTORS_FILE).is_file() && dir.join(DOCUMENTS_FILE).is_file()
}

/// Persist `index` into `dir`, creating the directory if needed.
pub async fn save_index(index: &VectorIndex, dir: &Path) -> Result<(), IndexError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| persistence(dir, "create directory", e))?;

    let raw = index.raw_vectors();
    let mut vectors = vec![0u8; raw.len() * F32_BYTES];
    LittleEndian::write_f32_into(raw, &mut vectors);

    let artifact = DocumentsArtifact {
        dimension: index.dimension(),
        documents: index.documents().to_vec(),
    };
    let documents = serde_json::to_vec_pretty(&artifact)
        .map_err(|e| IndexError::Persistence(format!("failed to serialize documents: {e}")))?;

    let vectors_path = dir.join(VECTORS_FILE);
    let documents_path = dir.join(DOCUMENTS_FILE);
    let vectors_tmp = write_temp(&vectors_path, &vectors).await?;
    let documents_tmp = match write_temp(&documents_path, &documents).await {
        Ok(tmp) => tmp,
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(&vectors_tmp).await {
                tracing::debug!(error = %cleanup, "failed to remove temporary vectors file");
            }
            return Err(e);
        }
    };

    rename_into(&vectors_tmp, &vectors_path).await?;
    rename_into(&documents_tmp, &documents_path).await?;

    tracing::info!(
        dir = %dir.display(),
        documents = index.len(),
        dimension = ?index.dimension(),
        "saved vector index"
    );
    Ok(())
}

/// Load an index previously written by [`save_index`].
///
/// Fails with `IndexError::Persistence` if the directory or either artifact
/// is missing, unreadable or inconsistent.
pub async fn load_index(dir: &Path) -> Result<VectorIndex, IndexError> {
    let vectors_path = dir.join(VECTORS_FILE);
    let documents_path = dir.join(DOCUMENTS_FILE);

    let raw = tokio::fs::read(&vectors_path)
        .await
        .map_err(|e| persistence(&vectors_path, "read", e))?;
    let json = tokio::fs::read(&documents_path)
        .await
        .map_err(|e| persistence(&documents_path, "read", e))?;

    if raw.len() % F32_BYTES != 0 {
        return Err(IndexError::Persistence(format!(
            "{} has {} bytes, not a whole number of f32 values",
            vectors_path.display(),
            raw.len()
        )));
    }

    let mut vectors = vec![0f32; raw.len() / F32_BYTES];
    LittleEndian::read_f32_into(&raw, &mut vectors);

    let artifact: DocumentsArtifact = serde_json::from_slice(&json).map_err(|e| {
        IndexError::Persistence(format!("failed to parse {}: {e}", documents_path.display()))
    })?;

    let index = VectorIndex::from_parts(artifact.dimension, vectors, artifact.documents)?;
    tracing::info!(
        dir = %dir.display(),
        documents = index.len(),
        dimension = ?index.dimension(),
        "loaded vector index"
    );
    Ok(index)
}

async fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf, IndexError> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| persistence(&tmp, "write", e))?;
    Ok(tmp)
}

async fn rename_into(tmp: &Path, path: &Path) -> Result<(), IndexError> {
    tokio::fs::rename(tmp, path)
        .await
        .map_err(|e| persistence(path, "rename into", e))
}

fn persistence(path: &Path, action: &str, err: std::io::Error) -> IndexError {
    IndexError::Persistence(format!("failed to {action} {}: {err}", path.display()))
}
