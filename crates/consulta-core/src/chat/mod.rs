//! Conversational turns over retrieval and session memory.

pub mod service;
pub mod session;
