//! OAuth 2.0 authorization-code session for bank providers.
//!
//! # Components
//!
//! - [`oauth`]: authorization URL, callback parsing, code exchange and refresh
//! - [`token_store`]: single-slot token file in the user's home directory
//! - [`session`]: token lifecycle (interactive authorization, forced refresh on
//!   start, refresh on expiry or rejection)
//! - [`prompt`]: the human interaction boundary

pub mod error;
pub mod oauth;
pub mod prompt;
pub mod session;
pub mod token_store;

pub use error::{OAuthError, Result};
pub use oauth::{OAuthConfig, TokenRecord};
pub use prompt::AuthorizationPrompt;
pub use session::{OAuthSession, TokenUpdater};
pub use token_store::TokenStore;
