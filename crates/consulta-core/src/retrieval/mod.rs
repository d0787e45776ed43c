//! Retrieval over the vector index.
//!
//! The `Embedder` and `DocumentSource` traits are the ports the
//! infrastructure layer implements; `Retriever` ties an embedder to a
//! shared index.

pub mod box_embedder;
pub mod embedder;
pub mod retriever;
pub mod source;
