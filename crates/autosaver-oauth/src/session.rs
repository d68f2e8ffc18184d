//! Token lifecycle for one provider.
//!
//! ```text
//! NoToken ──prompt + code exchange──▶ TokenHeld
//! stored token ──forced refresh────▶ TokenHeld
//! TokenHeld ──expiry or 401─refresh─▶ TokenHeld
//! ```
//!
//! A session resumed from a stored token is refreshed before it is handed
//! out, whatever the stored expiry says. Every new token (exchange or
//! refresh) goes through the `on_refresh` hook, which is where persistence
//! happens.

use std::fmt;

use parking_lot::Mutex;

use crate::error::{OAuthError, Result};
use crate::oauth::{
    OAuthConfig, TokenRecord, build_authorization_url, exchange_code, generate_state, now_secs,
    parse_callback, refresh_access_token,
};
use crate::prompt::AuthorizationPrompt;
use crate::token_store::TokenStore;

/// Called synchronously with every newly issued token.
pub type TokenUpdater = Box<dyn Fn(&TokenRecord) -> Result<()> + Send + Sync>;

/// An authenticated OAuth session.
pub struct OAuthSession {
    config: OAuthConfig,
    http: reqwest::Client,
    token: Mutex<TokenRecord>,
    on_refresh: TokenUpdater,
}

impl fmt::Debug for OAuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSession")
            .field("config", &self.config)
            .field("expires_at", &self.token.lock().expires_at)
            .finish_non_exhaustive()
    }
}

impl OAuthSession {
    /// Start a session from whatever `store` holds.
    ///
    /// With no stored token the interactive flow runs through `prompt`;
    /// otherwise the stored token is refreshed.
    pub async fn start(
        config: OAuthConfig,
        http: reqwest::Client,
        store: &TokenStore,
        prompt: &dyn AuthorizationPrompt,
        on_refresh: TokenUpdater,
    ) -> Result<Self> {
        match store.load()? {
            Some(token) => Self::resume(config, http, token, on_refresh).await,
            None => Self::authorize(config, http, prompt, on_refresh).await,
        }
    }

    /// Resume from a stored token, refreshing it unconditionally.
    pub async fn resume(
        config: OAuthConfig,
        http: reqwest::Client,
        mut token: TokenRecord,
        on_refresh: TokenUpdater,
    ) -> Result<Self> {
        token.expire_now(now_secs());
        let session = Self {
            config,
            http,
            token: Mutex::new(token),
            on_refresh,
        };

        tracing::info!("Refreshing stored token before first use");
        session.access_token().await?;
        Ok(session)
    }

    /// Run the interactive authorization-code flow.
    pub async fn authorize(
        config: OAuthConfig,
        http: reqwest::Client,
        prompt: &dyn AuthorizationPrompt,
        on_refresh: TokenUpdater,
    ) -> Result<Self> {
        let state = generate_state();
        let authorization_url = build_authorization_url(&config, &state);

        tracing::info!("No stored token, starting interactive authorization");
        let response = prompt.authorize(&authorization_url)?;
        let callback = parse_callback(&response)?;

        if callback.state != state {
            return Err(OAuthError::Auth(
                "State mismatch in callback, refusing to exchange the code".to_string(),
            ));
        }

        let token = exchange_code(&http, &config, &callback.code).await?;
        on_refresh(&token)?;
        tracing::info!("Authorization complete");

        Ok(Self {
            config,
            http,
            token: Mutex::new(token),
            on_refresh,
        })
    }

    /// A bearer token that is not expired, refreshing first if needed.
    pub async fn access_token(&self) -> Result<String> {
        let current = self.token.lock().clone();
        if current.is_expired(now_secs()) {
            return Ok(self.refresh().await?.access_token);
        }
        Ok(current.access_token)
    }

    /// Exchange the refresh token for a new token and persist it.
    pub async fn refresh(&self) -> Result<TokenRecord> {
        let old = self.token.lock().clone();
        if old.refresh_token.is_empty() {
            return Err(OAuthError::Auth(
                "Stored token has no refresh token; delete the token file to authorize again"
                    .to_string(),
            ));
        }

        let mut new = refresh_access_token(&self.http, &self.config, &old.refresh_token).await?;
        if new.refresh_token.is_empty() {
            new.refresh_token = old.refresh_token;
        }

        (self.on_refresh)(&new)?;
        *self.token.lock() = new.clone();

        tracing::info!("Token refreshed successfully");
        Ok(new)
    }

    /// Snapshot of the token currently held.
    pub fn token(&self) -> TokenRecord {
        self.token.lock().clone()
    }
}
