//! Exact-search vector index over document embeddings.
//!
//! The index is pure in-memory state; persisting it to disk is an
//! infrastructure concern (see `consulta-infra::index`).

pub mod vector;
