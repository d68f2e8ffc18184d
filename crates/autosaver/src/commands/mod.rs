//! CLI command handlers.

pub mod auth;
pub mod run;

use std::path::PathBuf;

use anyhow::Result;

use autosaver_config::LoadedConfig;
use autosaver_oauth::TokenStore;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file, bypassing discovery.
    pub config_path: Option<PathBuf>,
    /// Token file in place of `~/.autosaver`.
    pub token_file: Option<PathBuf>,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let loaded = autosaver_config::load_config(self.config_path.as_deref())?;
        if self.verbose {
            eprintln!("Using config {}", loaded.source.display());
        }
        Ok(loaded)
    }

    pub fn token_store(&self) -> Result<TokenStore> {
        match &self.token_file {
            Some(path) => Ok(TokenStore::new(path)),
            None => Ok(TokenStore::in_home()?),
        }
    }
}
