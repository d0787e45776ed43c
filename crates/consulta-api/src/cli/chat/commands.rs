//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and control the session rather than being sent
//! as questions.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Exit the chat session.
    Exit,
    /// Forget the conversation and start a new session.
    Reset,
    /// Show the current memory context.
    Context,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/reset" | "/new" => Some(ChatCommand::Reset),
        "/context" | "/memory" => Some(ChatCommand::Context),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}     {}", style("/help").cyan(), "Show this help message");
    println!("  {}  {}", style("/context").cyan(), "Show what the assistant remembers");
    println!("  {}    {}", style("/reset").cyan(), "Forget the conversation");
    println!("  {}     {}", style("/exit").cyan(), "End the chat session");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("  /Q  "), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_reset_and_context() {
        assert_eq!(parse("/reset"), Some(ChatCommand::Reset));
        assert_eq!(parse("/new"), Some(ChatCommand::Reset));
        assert_eq!(parse("/context"), Some(ChatCommand::Context));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("¿Cuál es el horario?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/foo bar"),
            Some(ChatCommand::Unknown("/foo".to_string()))
        );
    }
}
