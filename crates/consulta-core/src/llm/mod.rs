//! LLM abstraction for the core.
//!
//! `AnswerGenerator` is the only model contract the core needs;
//! `BoxAnswerGenerator` erases it for runtime provider selection.

pub mod box_generator;
pub mod generator;
pub mod prompt;
