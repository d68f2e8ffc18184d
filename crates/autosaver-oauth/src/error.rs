//! Error types for the OAuth session.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, OAuthError>;

/// Errors that can occur while acquiring, refreshing or storing tokens.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Code exchange or refresh was refused or could not complete.
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// The callback string could not be understood.
    #[error("Invalid callback URL: {0}")]
    InvalidCallback(String),

    /// The interaction boundary failed to produce a callback.
    #[error("Authorization prompt failed: {0}")]
    Prompt(String),

    /// Token file could not be read or written.
    #[error("Token file '{path}': {source}")]
    TokenFile {
        path: String,
        source: std::io::Error,
    },

    /// Token file exists but does not hold a token record.
    #[error("Token file '{path}' is not a valid token record: {source}")]
    TokenFormat {
        path: String,
        source: serde_json::Error,
    },

    /// No home directory to place the token file in.
    #[error("Could not determine home directory for the token file")]
    NoHomeDir,
}

impl OAuthError {
    /// True for token-file failures (read, write or parse).
    pub fn is_token_store_error(&self) -> bool {
        matches!(
            self,
            OAuthError::TokenFile { .. } | OAuthError::TokenFormat { .. } | OAuthError::NoHomeDir
        )
    }
}
