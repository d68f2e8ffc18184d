//! Single-slot token persistence.
//!
//! The token lives in one JSON file (`~/.autosaver` by default):
//!
//! ```json
//! {"about": "...", "token": {"access_token": "...", "refresh_token": "..."}}
//! ```
//!
//! There is no locking: two concurrent runs against the same file race and
//! the last writer wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OAuthError, Result};
use crate::oauth::TokenRecord;
use crate::session::TokenUpdater;

/// Token file name within the user's home directory.
pub const TOKEN_FILE: &str = ".autosaver";

/// Provenance marker written next to the token.
const ABOUT: &str = "OAuth token written by autosaver. Delete this file to authorize again.";

#[derive(Serialize)]
struct TokenFileOut<'a> {
    about: &'a str,
    token: &'a TokenRecord,
}

#[derive(Deserialize)]
struct TokenFileIn {
    token: TokenRecord,
}

/// File-backed store for one token record.
#[derive(Debug, Clone)]
pub struct TokenStore {
    token_path: PathBuf,
}

impl TokenStore {
    /// Create a store at a custom path.
    pub fn new(token_path: impl Into<PathBuf>) -> Self {
        Self {
            token_path: token_path.into(),
        }
    }

    /// Create the default store at `~/.autosaver`.
    pub fn in_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(OAuthError::NoHomeDir)?;
        Ok(Self::new(home.join(TOKEN_FILE)))
    }

    /// Get the token file path.
    pub fn path(&self) -> &Path {
        &self.token_path
    }

    /// Check if a token file exists.
    pub fn exists(&self) -> bool {
        self.token_path.exists()
    }

    /// Write `token`, replacing whatever was stored before.
    pub fn save(&self, token: &TokenRecord) -> Result<()> {
        let json = serde_json::to_string(&TokenFileOut {
            about: ABOUT,
            token,
        })
        .map_err(|e| self.format_error(e))?;

        std::fs::write(&self.token_path, json).map_err(|e| self.file_error(e))?;

        tracing::info!("Token saved to {}", self.token_path.display());
        Ok(())
    }

    /// Read the stored token.
    ///
    /// A missing file is the normal first-run state and yields `None`.
    pub fn load(&self) -> Result<Option<TokenRecord>> {
        let content = match std::fs::read_to_string(&self.token_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.file_error(e)),
        };

        let file: TokenFileIn =
            serde_json::from_str(&content).map_err(|e| self.format_error(e))?;

        tracing::debug!("Token loaded from {}", self.token_path.display());
        Ok(Some(file.token))
    }

    /// Remove the token file. Returns whether there was one.
    pub fn delete(&self) -> Result<bool> {
        match std::fs::remove_file(&self.token_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.file_error(e)),
        }
    }

    /// A hook that persists every new token into this store.
    pub fn updater(&self) -> TokenUpdater {
        let store = self.clone();
        Box::new(move |token| store.save(token))
    }

    fn file_error(&self, source: std::io::Error) -> OAuthError {
        OAuthError::TokenFile {
            path: self.token_path.display().to_string(),
            source,
        }
    }

    fn format_error(&self, source: serde_json::Error) -> OAuthError {
        OAuthError::TokenFormat {
            path: self.token_path.display().to_string(),
            source,
        }
    }
}
