//! The capability every bank provider implements.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::money::MoneyAmount;
use crate::types::{GoalData, IdempotencyKey, SaveResult};

/// Balance, goal and deposit operations against one configured account.
///
/// Callers use them in a fixed order: [`get_balance`](Self::get_balance),
/// [`get_goal_data`](Self::get_goal_data), then at most one
/// [`save_to_goal`](Self::save_to_goal).
#[async_trait]
pub trait BankClient: Send + Sync {
    /// Provider name for display.
    fn name(&self) -> &'static str;

    /// Current balance of the configured account.
    async fn get_balance(&self) -> Result<MoneyAmount>;

    /// The configured savings goal or pot.
    async fn get_goal_data(&self) -> Result<GoalData>;

    /// Deposit `amount` into the goal, tagged with `key`.
    ///
    /// Every request this makes for one call must carry the same `key`.
    async fn deposit(&self, amount: MoneyAmount, key: &IdempotencyKey) -> Result<SaveResult>;

    /// A fresh idempotency key.
    fn idempotency_key(&self) -> IdempotencyKey {
        IdempotencyKey::new()
    }

    /// Deposit `amount` into the goal under a newly minted idempotency key.
    ///
    /// Non-positive amounts are rejected before anything is sent. A deposit
    /// the provider declines is `Ok` with `success == false`.
    async fn save_to_goal(&self, amount: MoneyAmount) -> Result<SaveResult> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount(amount));
        }

        let key = self.idempotency_key();
        tracing::info!("Depositing {} into {} goal (key {})", amount, self.name(), key);

        let result = self.deposit(amount, &key).await?;
        if !result.success {
            tracing::warn!("{} declined the deposit (HTTP {})", self.name(), result.status);
        }
        Ok(result)
    }
}
