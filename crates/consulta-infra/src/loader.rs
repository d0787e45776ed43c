//! Directory document loader.
//!
//! Walks a directory recursively for text files with the configured
//! extensions and turns each one into documents. Markdown files go through
//! `MarkdownSplitter` for heading-aware chunking; everything else uses
//! `TextSplitter`. Chunk size and overlap are measured in characters.
//!
//! Every document carries `source` (path relative to the root, with `/`
//! separators) and `chunk` (0-based position within its file) metadata.

use std::path::{Path, PathBuf};

use consulta_core::retrieval::source::DocumentSource;
use consulta_types::config::IndexConfig;
use consulta_types::document::{CHUNK_KEY, Document};
use consulta_types::error::LoaderError;
use text_splitter::{Characters, ChunkConfig, MarkdownSplitter, TextSplitter};
use walkdir::WalkDir;

/// Loads and chunks every matching file under a root directory.
pub struct DirectoryLoader {
    root: PathBuf,
    extensions: Vec<String>,
    split_by_file: bool,
    text_splitter: TextSplitter<Characters>,
    markdown_splitter: MarkdownSplitter<Characters>,
}

fn chunk_config(size: usize, overlap: usize) -> Result<ChunkConfig<Characters>, LoaderError> {
    ChunkConfig::new(size)
        .with_overlap(overlap)
        .map_err(|e| LoaderError::InvalidConfig(e.to_string()))
}

impl DirectoryLoader {
    /// Create a loader for `root`.
    ///
    /// Fails with `LoaderError::InvalidConfig` when `chunk_size` is zero or
    /// `chunk_overlap` is not smaller than `chunk_size`.
    pub fn new(
        root: impl Into<PathBuf>,
        chunk_size: usize,
        chunk_overlap: usize,
        split_by_file: bool,
        extensions: Vec<String>,
    ) -> Result<Self, LoaderError> {
        if chunk_size == 0 {
            return Err(LoaderError::InvalidConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }

        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        Ok(Self {
            root: root.into(),
            extensions,
            split_by_file,
            text_splitter: TextSplitter::new(chunk_config(chunk_size, chunk_overlap)?),
            markdown_splitter: MarkdownSplitter::new(chunk_config(chunk_size, chunk_overlap)?),
        })
    }

    /// Create a loader for `root` using the `[index]` config section.
    pub fn from_config(root: impl Into<PathBuf>, config: &IndexConfig) -> Result<Self, LoaderError> {
        Self::new(
            root,
            config.chunk_size,
            config.chunk_overlap,
            config.split_by_file,
            config.extensions.clone(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Matching files under the root, sorted by path.
    fn discover(&self) -> Result<Vec<PathBuf>, LoaderError> {
        if !self.root.is_dir() {
            return Err(LoaderError::NotFound(self.root.display().to_string()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if self.matches_extension(path) {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }

    fn is_markdown(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
            Some("md" | "markdown")
        )
    }

    fn source_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Split one file's text into documents.
    fn split(&self, source: &str, text: &str, markdown: bool) -> Vec<Document> {
        let chunks: Vec<&str> = if self.split_by_file {
            vec![text.trim()]
        } else if markdown {
            self.markdown_splitter.chunks(text).collect()
        } else {
            self.text_splitter.chunks(text).collect()
        };

        chunks
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .enumerate()
            .map(|(i, chunk)| {
                Document::new(chunk)
                    .with_source(source)
                    .with_metadata(CHUNK_KEY, i.to_string())
            })
            .collect()
    }
}

impl DocumentSource for DirectoryLoader {
    #[tracing::instrument(name = "load_documents", skip_all, fields(root = %self.root.display()))]
    async fn load(&self) -> Result<Vec<Document>, LoaderError> {
        let files = self.discover()?;
        let mut documents = Vec::new();

        for path in &files {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LoaderError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let source = self.source_name(path);
            let docs = self.split(&source, &text, Self::is_markdown(path));
            tracing::debug!(source = %source, chunks = docs.len(), "loaded file");
            documents.extend(docs);
        }

        tracing::info!(files = files.len(), documents = documents.len(), "loaded documents");
        Ok(documents)
    }
}
