//! CLI command definitions for the `consulta` binary.
//!
//! Uses clap derive macros for argument parsing. Every command shares the
//! global `--json`, `--quiet` and `--verbose` flags.

pub mod ask;
pub mod chat;
pub mod index;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

/// Ask questions about your documents.
#[derive(Parser)]
#[command(name = "consulta", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Print only results, hiding spinners and logs below error.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding config.toml, documents and the index.
    #[arg(long, global = true, env = "CONSULTA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load, chunk and embed documents, then persist the index.
    Index {
        /// Directory to index (defaults to `index.documents_dir`).
        #[arg(long)]
        docs: Option<PathBuf>,
    },

    /// Ask a single question and exit.
    Ask {
        /// The question.
        question: String,

        /// Session id to keep memory under (a fresh one by default).
        #[arg(long)]
        session: Option<String>,
    },

    /// Start an interactive chat session.
    Chat,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

impl Cli {
    /// Whether spinners and styled status lines should be shown.
    pub fn show_progress(&self) -> bool {
        !self.json && !self.quiet
    }

    /// Log filter for the selected verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,consulta=debug",
            _ => "trace",
        }
    }
}

/// A ticking cyan spinner with the given message.
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
