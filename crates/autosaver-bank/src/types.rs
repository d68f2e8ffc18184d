//! Values returned by bank clients.

use std::fmt;

use serde_json::Value;
use uuid::Uuid;

use crate::money::MoneyAmount;

/// Snapshot of the configured savings goal (Starling) or pot (Monzo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalData {
    pub name: String,
    pub balance: MoneyAmount,
    pub target: MoneyAmount,
}

/// Outcome of a deposit into the goal.
///
/// `success` is the provider's application-level verdict; `status` and `raw`
/// are kept so a failure can be reported verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveResult {
    pub success: bool,
    pub status: u16,
    pub raw: Value,
}

impl SaveResult {
    /// Judge a deposit response: 2xx and no explicit `"success": false`.
    pub fn from_response(status: u16, raw: Value) -> Self {
        let declined = raw.get("success").and_then(Value::as_bool) == Some(false);
        Self {
            success: (200..300).contains(&status) && !declined,
            status,
            raw,
        }
    }
}

/// Client-generated key that makes a deposit safe to resend.
///
/// One key is minted per logical deposit; every attempt of that deposit
/// carries the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// A fresh random (v4) key.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for IdempotencyKey {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for IdempotencyKey {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
