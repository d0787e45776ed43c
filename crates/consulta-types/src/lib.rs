//! Shared domain types for Consulta.
//!
//! Documents, search hits, configuration and the error taxonomy used by the
//! core, infrastructure and application crates.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod document;
pub mod error;
pub mod llm;
