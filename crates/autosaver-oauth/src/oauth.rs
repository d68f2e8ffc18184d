//! OAuth 2.0 authorization-code flow: authorization URL, callback parsing,
//! code exchange and refresh.

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{OAuthError, Result};

/// Seconds before expiry at which a token is already treated as expired.
const REFRESH_BUFFER_SECS: f64 = 60.0;

/// Lifetime written into a token that must be refreshed before use.
const FORCED_EXPIRES_IN: i64 = -10;

/// OAuth client registration for one provider.
#[derive(Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub redirect_uri: String,
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Generate a random state string for CSRF protection.
pub fn generate_state() -> String {
    let mut state_bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut state_bytes);
    URL_SAFE_NO_PAD.encode(state_bytes)
}

/// Build the authorization URL for the OAuth flow.
pub fn build_authorization_url(config: &OAuthConfig, state: &str) -> String {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("response_type", "code"),
        ("state", state),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", config.authorize_url, query)
}

/// Code and state carried back on the redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCallback {
    pub code: String,
    pub state: String,
}

/// Parse the full callback URL the user was redirected to.
///
/// An `error` parameter means the user (or the provider) refused access.
pub fn parse_callback(input: &str) -> Result<AuthorizationCallback> {
    let url = url::Url::parse(input.trim())
        .map_err(|e| OAuthError::InvalidCallback(format!("{}: {}", input.trim(), e)))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(OAuthError::Auth(format!(
                    "Provider returned error: {}",
                    value
                )));
            }
            _ => {}
        }
    }

    match (code, state) {
        (Some(code), Some(state)) if !code.is_empty() && !state.is_empty() => {
            Ok(AuthorizationCallback { code, state })
        }
        _ => Err(OAuthError::InvalidCallback(
            "Missing code or state".to_string(),
        )),
    }
}

/// A token as issued by the provider's token endpoint.
///
/// Fields the provider adds beyond the standard ones are kept in `extra`
/// and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenRecord {
    /// Derive `expires_at` from `expires_in` relative to `now`.
    pub fn stamp(&mut self, now: i64) {
        if let Some(expires_in) = self.expires_in {
            self.expires_at = Some((now + expires_in) as f64);
        }
    }

    /// Mark the token as already expired so the next use refreshes it.
    pub fn expire_now(&mut self, now: i64) {
        self.expires_in = Some(FORCED_EXPIRES_IN);
        self.expires_at = Some((now + FORCED_EXPIRES_IN) as f64);
    }

    /// A token without an expiry never expires on its own.
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expires_at {
            Some(at) => now as f64 >= at - REFRESH_BUFFER_SECS,
            None => false,
        }
    }
}

/// Current time in whole seconds since the Unix epoch.
pub(crate) fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Exchange an authorization code for a token.
pub async fn exchange_code(
    http: &reqwest::Client,
    config: &OAuthConfig,
    code: &str,
) -> Result<TokenRecord> {
    let params = [
        ("grant_type", "authorization_code"),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("code", code),
    ];
    request_token(http, &config.token_url, &params, "Token exchange").await
}

/// Refresh an access token using a refresh token.
pub async fn refresh_access_token(
    http: &reqwest::Client,
    config: &OAuthConfig,
    refresh_token: &str,
) -> Result<TokenRecord> {
    let params = [
        ("grant_type", "refresh_token"),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", refresh_token),
    ];
    request_token(http, &config.token_url, &params, "Token refresh").await
}

async fn request_token(
    http: &reqwest::Client,
    token_url: &str,
    params: &[(&str, &str)],
    what: &str,
) -> Result<TokenRecord> {
    let response = http
        .post(token_url)
        .form(params)
        .send()
        .await
        .map_err(|e| OAuthError::Auth(format!("{} request failed: {}", what, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(OAuthError::Auth(format!(
            "{} failed (HTTP {}): {}",
            what, status, error_text
        )));
    }

    let mut token: TokenRecord = response
        .json()
        .await
        .map_err(|e| OAuthError::Auth(format!("Failed to parse {} response: {}", what, e)))?;
    token.stamp(now_secs());

    Ok(token)
}
