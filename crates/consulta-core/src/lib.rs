//! Core logic for Consulta: document Q&A with self-summarizing memory.
//!
//! This crate holds the vector index, the retriever, the bounded memory
//! manager and the chat service, and defines the collaborator traits
//! (`Embedder`, `AnswerGenerator`, `DocumentSource`) that the
//! infrastructure layer implements. It depends only on `consulta-types`,
//! never on `consulta-infra` or any network/IO crate.

pub mod chat;
pub mod index;
pub mod llm;
pub mod memory;
pub mod retrieval;

#[cfg(test)]
mod testing;
