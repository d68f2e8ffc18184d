//! Provider selection.

use async_trait::async_trait;

use autosaver_config::{AutosaverConfig, Provider};
use autosaver_oauth::{AuthorizationPrompt, TokenStore};

use crate::client::BankClient;
use crate::error::Result;
use crate::money::MoneyAmount;
use crate::monzo::MonzoBank;
use crate::starling::StarlingBank;
use crate::types::{GoalData, IdempotencyKey, SaveResult};

/// The provider chosen by `use` in the configuration.
pub enum Bank {
    Starling(StarlingBank),
    Monzo(MonzoBank),
}

impl Bank {
    /// Build the configured provider.
    ///
    /// `store` and `prompt` are only touched for Monzo.
    pub async fn from_config(
        config: &AutosaverConfig,
        store: &TokenStore,
        prompt: &dyn AuthorizationPrompt,
    ) -> Result<Self> {
        let bank = match config.provider()? {
            Provider::Starling => Bank::Starling(StarlingBank::new(config.starling()?, &config.http)?),
            Provider::Monzo => {
                Bank::Monzo(MonzoBank::connect(config.monzo()?, &config.http, store, prompt).await?)
            }
        };
        tracing::info!("Using {}", bank.name());
        Ok(bank)
    }

    fn client(&self) -> &dyn BankClient {
        match self {
            Bank::Starling(bank) => bank,
            Bank::Monzo(bank) => bank,
        }
    }
}

#[async_trait]
impl BankClient for Bank {
    fn name(&self) -> &'static str {
        self.client().name()
    }

    async fn get_balance(&self) -> Result<MoneyAmount> {
        self.client().get_balance().await
    }

    async fn get_goal_data(&self) -> Result<GoalData> {
        self.client().get_goal_data().await
    }

    async fn deposit(&self, amount: MoneyAmount, key: &IdempotencyKey) -> Result<SaveResult> {
        self.client().deposit(amount, key).await
    }
}
