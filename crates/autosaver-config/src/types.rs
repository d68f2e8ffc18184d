//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! use = "starling"
//! start_month_with = "500.00"
//! end_month_with = "50.00"
//!
//! [starling]               # personal access token provider
//! [monzo]                  # OAuth provider
//! [http]                   # transport settings
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::secrets::{ResolvedSecret, resolve_secret};
use crate::{ConfigError, Result};

/// Default Starling API root.
pub const STARLING_API_URL: &str = "https://api.starlingbank.com";

/// Default Monzo API root.
pub const MONZO_API_URL: &str = "https://api.monzo.com";

/// Default Monzo authorization page.
pub const MONZO_AUTH_URL: &str = "https://auth.monzo.com/";

/// Env var overriding `starling.personal_access_token`.
pub const STARLING_TOKEN_ENV: &str = "AUTOSAVER_STARLING_TOKEN";

/// Env var overriding `monzo.client_secret`.
pub const MONZO_SECRET_ENV: &str = "AUTOSAVER_MONZO_CLIENT_SECRET";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Loaded once at startup and passed by reference to whichever bank client is
/// built from it. Nothing mutates it afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutosaverConfig {
    /// Selected provider name (`use` in the file).
    #[serde(default, rename = "use")]
    pub provider: Option<String>,

    /// Balance the month should start with.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub start_month_with: Decimal,

    /// Balance the month should end with.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub end_month_with: Decimal,

    #[serde(default)]
    pub starling: Option<StarlingConfig>,

    #[serde(default)]
    pub monzo: Option<MonzoConfig>,

    #[serde(default)]
    pub http: HttpConfig,
}

impl AutosaverConfig {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// The selected provider.
    pub fn provider(&self) -> Result<Provider> {
        match self.provider.as_deref().map(str::trim) {
            None | Some("") => Err(ConfigError::NoProvider),
            Some(name) => name.parse(),
        }
    }

    /// The `[starling]` section, required when Starling is selected.
    pub fn starling(&self) -> Result<&StarlingConfig> {
        self.starling.as_ref().ok_or_else(|| ConfigError::MissingSection {
            provider: Provider::Starling.to_string(),
        })
    }

    /// The `[monzo]` section, required when Monzo is selected.
    pub fn monzo(&self) -> Result<&MonzoConfig> {
        self.monzo.as_ref().ok_or_else(|| ConfigError::MissingSection {
            provider: Provider::Monzo.to_string(),
        })
    }

    /// Sections that carry a secret in plaintext.
    pub fn plaintext_secrets(&self) -> Vec<&'static str> {
        let mut sections = Vec::new();
        if self
            .starling
            .as_ref()
            .is_some_and(|s| s.personal_access_token.is_some())
        {
            sections.push("starling");
        }
        if self.monzo.as_ref().is_some_and(|m| m.client_secret.is_some()) {
            sections.push("monzo");
        }
        sections
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────────────────────────────────────

/// Supported bank providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Starling,
    Monzo,
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "starling" => Ok(Provider::Starling),
            "monzo" => Ok(Provider::Monzo),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Starling => write!(f, "starling"),
            Provider::Monzo => write!(f, "monzo"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Starling
// ─────────────────────────────────────────────────────────────────────────────

/// Starling settings. Authenticates with a personal access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarlingConfig {
    /// Personal access token; `AUTOSAVER_STARLING_TOKEN` takes precedence.
    #[serde(default)]
    pub personal_access_token: Option<String>,

    pub account_uid: String,

    pub goal_uid: String,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_starling_api_url")]
    pub api_url: String,
}

impl StarlingConfig {
    /// Resolve the access token (env var, then file).
    pub fn access_token(&self) -> Result<ResolvedSecret> {
        resolve_secret(STARLING_TOKEN_ENV, self.personal_access_token.as_deref()).ok_or_else(
            || ConfigError::MissingField {
                field: "personal_access_token".to_string(),
                section: "starling".to_string(),
            },
        )
    }
}

fn default_currency() -> String {
    "GBP".to_string()
}

fn default_starling_api_url() -> String {
    STARLING_API_URL.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Monzo
// ─────────────────────────────────────────────────────────────────────────────

/// Monzo settings. Authenticates through the OAuth authorization-code flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonzoConfig {
    pub account_id: String,

    pub pot_id: String,

    /// Target for the pot. Falls back to the pot's own goal when unset.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub pot_target: Option<Decimal>,

    pub client_id: String,

    /// OAuth client secret; `AUTOSAVER_MONZO_CLIENT_SECRET` takes precedence.
    #[serde(default)]
    pub client_secret: Option<String>,

    pub redirect_uri: String,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default = "default_monzo_api_url")]
    pub api_url: String,

    #[serde(default = "default_monzo_auth_url")]
    pub auth_url: String,
}

impl MonzoConfig {
    /// Resolve the client secret (env var, then file).
    pub fn client_secret(&self) -> Result<ResolvedSecret> {
        resolve_secret(MONZO_SECRET_ENV, self.client_secret.as_deref()).ok_or_else(|| {
            ConfigError::MissingField {
                field: "client_secret".to_string(),
                section: "monzo".to_string(),
            }
        })
    }

    /// Token endpoint derived from the API root.
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.api_url.trim_end_matches('/'))
    }
}

fn default_monzo_api_url() -> String {
    MONZO_API_URL.to_string()
}

fn default_monzo_auth_url() -> String {
    MONZO_AUTH_URL.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP
// ─────────────────────────────────────────────────────────────────────────────

/// Transport settings shared by both providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const STARLING_TOML: &str = r#"
use = "starling"
start_month_with = "500.00"
end_month_with = "50.00"

[starling]
personal_access_token = "pat"
account_uid = "acc"
goal_uid = "goal"
"#;

    const MONZO_TOML: &str = r#"
use = "MONZO"

[monzo]
account_id = "acc_1"
pot_id = "pot_1"
pot_target = "333.00"
client_id = "client"
client_secret = "secret"
redirect_uri = "https://example.com"
api_url = "http://localhost:9999/"
"#;

    #[test]
    fn test_parse_starling() {
        let config = AutosaverConfig::from_toml(STARLING_TOML).unwrap();
        assert_eq!(config.provider().unwrap(), Provider::Starling);
        assert_eq!(config.start_month_with, dec!(500.00));
        assert_eq!(config.end_month_with, dec!(50.00));

        let starling = config.starling().unwrap();
        assert_eq!(starling.account_uid, "acc");
        assert_eq!(starling.currency, "GBP");
        assert_eq!(starling.api_url, STARLING_API_URL);
        assert!(config.monzo().is_err());
    }

    #[test]
    fn test_parse_monzo() {
        let config = AutosaverConfig::from_toml(MONZO_TOML).unwrap();
        assert_eq!(config.provider().unwrap(), Provider::Monzo);
        assert_eq!(config.start_month_with, Decimal::ZERO);

        let monzo = config.monzo().unwrap();
        assert_eq!(monzo.pot_target, Some(dec!(333.00)));
        assert_eq!(monzo.auth_url, MONZO_AUTH_URL);
        assert_eq!(monzo.token_url(), "http://localhost:9999/oauth2/token");
    }

    #[test]
    fn test_decimal_precision_kept() {
        let config = AutosaverConfig::from_toml(r#"start_month_with = "0.10""#).unwrap();
        assert_eq!(config.start_month_with.to_string(), "0.10");
    }

    #[test]
    fn test_missing_provider() {
        let config = AutosaverConfig::from_toml("").unwrap();
        assert!(matches!(config.provider(), Err(ConfigError::NoProvider)));

        let config = AutosaverConfig::from_toml(r#"use = "  ""#).unwrap();
        assert!(matches!(config.provider(), Err(ConfigError::NoProvider)));
    }

    #[test]
    fn test_unknown_provider() {
        let config = AutosaverConfig::from_toml(r#"use = "barclays""#).unwrap();
        assert!(matches!(
            config.provider(),
            Err(ConfigError::UnknownProvider(name)) if name == "barclays"
        ));
    }

    #[test]
    fn test_missing_section() {
        let config = AutosaverConfig::from_toml(r#"use = "monzo""#).unwrap();
        let err = config.monzo().unwrap_err();
        assert!(err.to_string().contains("[monzo]"));
    }

    #[test]
    fn test_plaintext_secrets() {
        let config = AutosaverConfig::from_toml(STARLING_TOML).unwrap();
        assert_eq!(config.plaintext_secrets(), vec!["starling"]);
    }

    #[test]
    fn test_http_defaults() {
        let config = AutosaverConfig::from_toml("").unwrap();
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_sample_config_parses() {
        let config =
            AutosaverConfig::from_toml(include_str!("../../../autosaver.sample.toml")).unwrap();
        assert_eq!(config.provider().unwrap(), Provider::Starling);
        assert_eq!(config.start_month_with, dec!(500.00));
        assert_eq!(config.end_month_with, dec!(50.00));
        assert_eq!(config.starling().unwrap().currency, "GBP");
        assert_eq!(config.monzo().unwrap().pot_target, None);
        assert_eq!(config.monzo().unwrap().auth_url, MONZO_AUTH_URL);
    }
}
