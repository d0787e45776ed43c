//! Conversational memory.
//!
//! `MemoryManager` keeps a token-bounded buffer of turns for one session and
//! collapses it into a summary through `MemorySummarizer` when it overflows.

pub mod manager;
pub mod summarizer;
