//! The interactive question/answer loop.

use std::io::Write;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use crate::cli::ask::print_reply;
use crate::cli::chat::commands::{self, ChatCommand};
use crate::cli::spinner;
use crate::state::AppState;

/// Run the chat loop until `/exit` or end of input.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let mut session_id = Uuid::now_v7().to_string();
    let documents = state.chat.retriever().index().read().await.len();

    println!();
    println!(
        "  {} {}",
        style("consulta").cyan().bold(),
        style(format!("{documents} indexed chunks")).dim()
    );
    println!("  {}", style("Type a question, or /help for commands.").dim());
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  {} ", style("You >").green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!("\n  {}", style("Session ended.").dim());
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Reset => {
                    state.chat.reset(&session_id);
                    session_id = Uuid::now_v7().to_string();
                    println!("\n  {} Memory cleared.\n", style("*").cyan().bold());
                }
                ChatCommand::Context => {
                    let context = state
                        .chat
                        .memory_context(&session_id)
                        .await
                        .unwrap_or_default();
                    println!();
                    if context.is_empty() {
                        println!("  {}", style("(nothing remembered yet)").dim());
                    } else {
                        println!("{context}");
                    }
                    println!();
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let thinking = spinner("thinking...");
        let result = state.chat.ask(&session_id, text).await;
        thinking.finish_and_clear();

        match result {
            Ok(reply) => print_reply(&reply),
            Err(e) => {
                eprintln!("\n  {} {e}", style("!").red().bold());
                eprintln!("  {}", style("Type a question to retry, /exit to quit.").dim());
            }
        }
    }

    Ok(())
}
