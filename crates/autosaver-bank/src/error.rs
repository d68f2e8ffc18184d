//! Bank client error types.
//!
//! A deposit the provider declines is not an error; it comes back as a
//! [`SaveResult`](crate::SaveResult) with `success == false`.

use thiserror::Error;

use autosaver_oauth::OAuthError;

use crate::money::MoneyAmount;

/// Bank client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed (connection, timeout, undecodable body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a status the call does not expect.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or a summary of it.
        message: String,
    },

    /// Credentials were rejected or could not be obtained.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The configured goal or pot does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token file could not be read or written.
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Amount is not valid for the operation.
    #[error("Invalid amount: {0}")]
    InvalidAmount(MoneyAmount),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Network failure or unexpected status.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status { .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<OAuthError> for Error {
    fn from(e: OAuthError) -> Self {
        if e.is_token_store_error() {
            Error::TokenStore(e.to_string())
        } else {
            Error::Auth(e.to_string())
        }
    }
}

impl From<autosaver_config::ConfigError> for Error {
    fn from(e: autosaver_config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

/// Result type for bank operations.
pub type Result<T> = std::result::Result<T, Error>;
