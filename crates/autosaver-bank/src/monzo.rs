//! Monzo: OAuth authorization-code flow, pots.

use async_trait::async_trait;
use serde::Deserialize;

use autosaver_config::{HttpConfig, MonzoConfig};
use autosaver_oauth::{AuthorizationPrompt, OAuthConfig, OAuthSession, TokenStore};

use crate::client::BankClient;
use crate::error::{Error, Result};
use crate::http::{ApiClient, Credential, RequestBody, http_client};
use crate::money::MoneyAmount;
use crate::types::{GoalData, IdempotencyKey, SaveResult};

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: i64,
}

#[derive(Debug, Deserialize)]
struct PotsResponse {
    pots: Vec<Pot>,
}

#[derive(Debug, Deserialize)]
struct Pot {
    id: String,
    name: String,
    balance: i64,
    #[serde(default)]
    goal_amount: Option<i64>,
    #[serde(default)]
    deleted: bool,
}

/// OAuth client registration for Monzo from the `[monzo]` section.
pub fn oauth_config(config: &MonzoConfig) -> Result<OAuthConfig> {
    let secret = config.client_secret()?;
    tracing::debug!("Monzo client secret from {}", secret.source);

    Ok(OAuthConfig {
        client_id: config.client_id.clone(),
        client_secret: secret.value,
        authorize_url: config.auth_url.clone(),
        token_url: config.token_url(),
        redirect_uri: config.redirect_uri.clone(),
    })
}

/// Monzo account whose bearer token comes from an [`OAuthSession`].
pub struct MonzoBank {
    api: ApiClient,
    account_id: String,
    pot_id: String,
    pot_target: Option<MoneyAmount>,
}

impl MonzoBank {
    /// Start an OAuth session from `store` and build the client on it.
    ///
    /// Runs the interactive flow through `prompt` when nothing is stored;
    /// otherwise refreshes the stored token. New tokens are saved to `store`.
    pub async fn connect(
        config: &MonzoConfig,
        http: &HttpConfig,
        store: &TokenStore,
        prompt: &dyn AuthorizationPrompt,
    ) -> Result<Self> {
        let client = http_client(http.timeout())?;
        let session = OAuthSession::start(
            oauth_config(config)?,
            client.clone(),
            store,
            prompt,
            store.updater(),
        )
        .await?;
        Self::with_session(config, client, session)
    }

    /// Build the client on an already started session.
    pub fn with_session(
        config: &MonzoConfig,
        http: reqwest::Client,
        session: OAuthSession,
    ) -> Result<Self> {
        let api = ApiClient::new(http, &config.api_url, Credential::Session(session))?;
        Ok(Self {
            api,
            account_id: config.account_id.clone(),
            pot_id: config.pot_id.clone(),
            pot_target: config.pot_target.map(MoneyAmount::from_decimal),
        })
    }
}

#[async_trait]
impl BankClient for MonzoBank {
    fn name(&self) -> &'static str {
        "Monzo"
    }

    async fn get_balance(&self) -> Result<MoneyAmount> {
        let balance: BalanceResponse = self
            .api
            .get("balance", &[("account_id", self.account_id.as_str())])
            .await?;
        Ok(MoneyAmount::from_minor_units(balance.balance))
    }

    async fn get_goal_data(&self) -> Result<GoalData> {
        let listing: PotsResponse = self
            .api
            .get("pots", &[("current_account_id", self.account_id.as_str())])
            .await?;

        let pot = listing
            .pots
            .into_iter()
            .find(|p| p.id == self.pot_id && !p.deleted)
            .ok_or_else(|| Error::NotFound(format!("pot '{}'", self.pot_id)))?;

        let target = self
            .pot_target
            .or_else(|| pot.goal_amount.map(MoneyAmount::from_minor_units))
            .unwrap_or(MoneyAmount::ZERO);

        Ok(GoalData {
            name: pot.name,
            balance: MoneyAmount::from_minor_units(pot.balance),
            target,
        })
    }

    /// The key travels as `dedupe_id`; Monzo applies a deposit at most once per id.
    async fn deposit(&self, amount: MoneyAmount, key: &IdempotencyKey) -> Result<SaveResult> {
        let path = format!("pots/{}/deposit", self.pot_id);
        let form = [
            ("source_account_id", self.account_id.clone()),
            ("amount", amount.to_minor_units()?.to_string()),
            ("dedupe_id", key.to_string()),
        ];
        self.api.put_deposit(&path, RequestBody::Form(&form)).await
    }
}
