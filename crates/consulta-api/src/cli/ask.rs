//! `consulta ask` - answer one question and exit.

use console::style;
use uuid::Uuid;

use consulta_core::chat::service::ChatReply;

use crate::cli::spinner;
use crate::state::AppState;

pub async fn ask_once(
    state: &AppState,
    question: &str,
    session: Option<String>,
    json: bool,
    progress: bool,
) -> anyhow::Result<()> {
    let session_id = session.unwrap_or_else(|| Uuid::now_v7().to_string());

    let bar = progress.then(|| spinner("Thinking..."));
    let result = state.chat.ask(&session_id, question).await;
    if let Some(p) = bar {
        p.finish_and_clear();
    }
    let reply = result?;

    if json {
        let out = serde_json::json!({
            "session_id": session_id,
            "reply": reply,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if progress {
        print_reply(&reply);
    } else {
        println!("{}", reply.answer);
    }

    Ok(())
}

/// Print an answer followed by its sources and any memory summary.
pub(crate) fn print_reply(reply: &ChatReply) {
    println!();
    println!("{}", reply.answer);

    if !reply.sources.is_empty() {
        println!();
        println!("  {}", style("Sources:").bold());
        for hit in &reply.sources {
            println!(
                "  {} {} {}",
                style("-").dim(),
                style(hit.document.source().unwrap_or("unknown")).cyan(),
                style(format!("(distance {:.4})", hit.distance)).dim()
            );
        }
    }

    if let Some(summary) = &reply.summary {
        println!();
        println!("  {} {}", style("Memory summarized:").yellow().bold(), summary);
    }
    println!();
}
