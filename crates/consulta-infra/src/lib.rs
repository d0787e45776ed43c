//! Infrastructure layer for Consulta.
//!
//! Contains implementations of the collaborator traits defined in
//! `consulta-core`: the OpenAI embeddings and chat clients, the directory
//! document loader, on-disk index persistence, and configuration loading.

pub mod config;
pub mod embedding;
pub mod index;
pub mod llm;
pub mod loader;
