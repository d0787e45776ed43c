//! Document types shared by the index, the retriever and conversational memory.
//!
//! A [`Document`] is a piece of text plus string metadata. Documents are
//! immutable once stored: the vector index and the memory buffer replace or
//! evict them wholesale rather than editing them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata key identifying a document's provenance.
pub const SOURCE_KEY: &str = "source";

/// Metadata key carrying the 0-based chunk position within a source file.
pub const CHUNK_KEY: &str = "chunk";

/// Reserved `source` value marking synthetic memory summaries.
pub const MEMORY_SUMMARY_SOURCE: &str = "memory_summary";

/// A text record with ordered string metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a document with no metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style metadata insertion.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builder-style `source` metadata.
    pub fn with_source(self, source: impl Into<String>) -> Self {
        self.with_metadata(SOURCE_KEY, source)
    }

    /// A conversational turn, role-tagged through its content prefix
    /// (e.g. `"Usuario: hola"`).
    pub fn turn(role: TurnRole, text: &str) -> Self {
        Self::new(format!("{role}: {text}"))
    }

    /// A synthetic summary document produced by memory eviction.
    pub fn memory_summary(summary: impl Into<String>) -> Self {
        Self::new(summary).with_source(MEMORY_SUMMARY_SOURCE)
    }

    /// The `source` metadata value, if any.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }

    /// Whether this document is a memory summary.
    pub fn is_memory_summary(&self) -> bool {
        self.source() == Some(MEMORY_SUMMARY_SOURCE)
    }

    /// Whitespace-delimited word count of the content.
    ///
    /// Used as an approximate token count by the memory buffer (1 word ~ 1 token).
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// Who produced a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "Usuario"),
            TurnRole::Assistant => write!(f, "Chatbot"),
        }
    }
}

/// A search hit: a document and its squared Euclidean distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub distance: f32,
}
