//! Auth command - OAuth token management for Monzo.

use std::process::ExitCode;

use anyhow::Result;
use chrono::DateTime;
use clap::{Args, Subcommand};

use autosaver_bank::MonzoBank;

use super::Context;
use crate::prompt::ConsolePrompt;

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Show the stored token
    Status,

    /// Authorize with Monzo, or refresh the stored token
    Login,

    /// Delete the stored token
    Logout,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<ExitCode> {
    match args.command {
        AuthCommand::Status => cmd_status(ctx),
        AuthCommand::Login => cmd_login(ctx).await,
        AuthCommand::Logout => cmd_logout(ctx),
    }
}

fn cmd_status(ctx: &Context) -> Result<ExitCode> {
    let store = ctx.token_store()?;

    println!("Token file: {}", store.path().display());

    // Status works without a config; the account owner is shown when one is found.
    if let Ok(loaded) = ctx.load_config()
        && let Some(user_id) = loaded.config.monzo.as_ref().and_then(|m| m.user_id.as_deref())
    {
        println!("Monzo user: {}", user_id);
    }

    match store.load() {
        Ok(Some(token)) => {
            println!("Token: stored");
            if let Some(owner) = token.extra.get("user_id").and_then(|v| v.as_str()) {
                println!("  Issued to: {}", owner);
            }
            match token
                .expires_at
                .and_then(|at| DateTime::from_timestamp(at as i64, 0))
            {
                Some(at) => println!("  Expires: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
                None => println!("  Expires: unknown"),
            }
            println!("  The next run refreshes it before use.");
        }
        Ok(None) => {
            println!("Token: none");
            println!("  Run 'autosaver auth login' to authorize with Monzo");
        }
        Err(e) => {
            println!("Token: unreadable ({})", e);
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn cmd_login(ctx: &Context) -> Result<ExitCode> {
    let loaded = ctx.load_config()?;
    let config = &loaded.config;
    let store = ctx.token_store()?;

    let fresh = !store.exists();
    MonzoBank::connect(config.monzo()?, &config.http, &store, &ConsolePrompt).await?;

    if fresh {
        println!("Authorization successful!");
    } else {
        println!("Stored token refreshed.");
    }
    println!("Token saved to {}", store.path().display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_logout(ctx: &Context) -> Result<ExitCode> {
    let store = ctx.token_store()?;

    if store.delete()? {
        println!("Token removed.");
    } else {
        println!("No token found.");
    }
    Ok(ExitCode::SUCCESS)
}
