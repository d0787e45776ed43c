//! Interactive CLI chat.
//!
//! Reads questions line by line from stdin, answers them through the chat
//! service and handles slash commands. Entry point: `loop_runner::run_chat_loop`.

pub mod commands;
pub mod loop_runner;
