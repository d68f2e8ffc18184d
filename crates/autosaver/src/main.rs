//! Autosaver - move spare cash into a savings goal.
//!
//! Main entry point for the autosaver CLI.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod budget;
mod commands;
mod prompt;

use commands::{auth, run};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Autosaver - move spare cash into a savings goal
#[derive(Parser)]
#[command(name = "autosaver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ./autosaver.toml, then ~/.config/autosaver/config.toml)
    #[arg(long, global = true, env = "AUTOSAVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// OAuth token file (default: ~/.autosaver)
    #[arg(long, global = true, env = "AUTOSAVER_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare the balance with today's budget and offer to save the surplus (default)
    Run,

    /// OAuth token management
    Auth(auth::AuthArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing: console (human-readable, stderr) + rotating JSON file
    let filter = if cli.verbose {
        "autosaver=debug,autosaver_bank=debug,autosaver_oauth=debug,autosaver_config=debug,info"
    } else {
        "autosaver=warn,autosaver_bank=warn,autosaver_oauth=warn,autosaver_config=warn,error"
    };

    let log_dir = autosaver_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "autosaver.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "autosaver=trace,autosaver_bank=trace,autosaver_oauth=trace,autosaver_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context {
        config_path: cli.config,
        token_file: cli.token_file,
        verbose: cli.verbose,
    };

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run::run(&ctx).await,
        Commands::Auth(args) => auth::run(args, &ctx).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::info!("Exiting with error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
