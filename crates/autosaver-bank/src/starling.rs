//! Starling: personal access token, savings goals.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use autosaver_config::{HttpConfig, StarlingConfig};

use crate::client::BankClient;
use crate::error::Result;
use crate::http::{ApiClient, Credential, RequestBody, http_client};
use crate::money::MoneyAmount;
use crate::types::{GoalData, IdempotencyKey, SaveResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrencyAndAmount {
    minor_units: i64,
}

impl CurrencyAndAmount {
    fn money(&self) -> MoneyAmount {
        MoneyAmount::from_minor_units(self.minor_units)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    effective_balance: CurrencyAndAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavingsGoalResponse {
    name: String,
    total_saved: CurrencyAndAmount,
    #[serde(default)]
    target: Option<CurrencyAndAmount>,
}

/// Starling account authenticated with a static personal access token.
pub struct StarlingBank {
    api: ApiClient,
    account_uid: String,
    goal_uid: String,
    currency: String,
}

impl StarlingBank {
    /// Create a client from the `[starling]` section.
    pub fn new(config: &StarlingConfig, http: &HttpConfig) -> Result<Self> {
        let token = config.access_token()?;
        tracing::debug!("Starling access token from {}", token.source);

        let api = ApiClient::new(
            http_client(http.timeout())?,
            &config.api_url,
            Credential::Static(token.value),
        )?;

        Ok(Self {
            api,
            account_uid: config.account_uid.clone(),
            goal_uid: config.goal_uid.clone(),
            currency: config.currency.clone(),
        })
    }

    fn goal_path(&self) -> String {
        format!(
            "api/v2/account/{}/savings-goals/{}",
            self.account_uid, self.goal_uid
        )
    }
}

#[async_trait]
impl BankClient for StarlingBank {
    fn name(&self) -> &'static str {
        "Starling"
    }

    async fn get_balance(&self) -> Result<MoneyAmount> {
        let path = format!("api/v2/accounts/{}/balance", self.account_uid);
        let balance: BalanceResponse = self.api.get(&path, &[]).await?;
        Ok(balance.effective_balance.money())
    }

    async fn get_goal_data(&self) -> Result<GoalData> {
        let goal: SavingsGoalResponse = self.api.get(&self.goal_path(), &[]).await?;
        Ok(GoalData {
            name: goal.name,
            balance: goal.total_saved.money(),
            target: goal
                .target
                .map(|t| t.money())
                .unwrap_or(MoneyAmount::ZERO),
        })
    }

    /// The key goes in the path; Starling applies a transfer uid at most once.
    async fn deposit(&self, amount: MoneyAmount, key: &IdempotencyKey) -> Result<SaveResult> {
        let path = format!("{}/add-money/{}", self.goal_path(), key);
        let body = json!({
            "amount": {
                "currency": self.currency,
                "minorUnits": amount.to_minor_units()?,
            }
        });
        self.api.put_deposit(&path, RequestBody::Json(&body)).await
    }
}
