//! Bank provider clients for autosaver.
//!
//! Two providers sit behind one [`BankClient`] capability:
//!
//! - **Starling** ([`StarlingBank`]): static personal access token
//! - **Monzo** ([`MonzoBank`]): OAuth authorization-code session with a
//!   persisted, auto-refreshing token
//!
//! Amounts cross the wire as integer minor units and are [`MoneyAmount`]
//! everywhere else. Deposits carry an [`IdempotencyKey`] so a resent request
//! is applied at most once.
//!
//! # Example
//!
//! ```no_run
//! use autosaver_bank::{Bank, BankClient, Result};
//! use autosaver_config::AutosaverConfig;
//! use autosaver_oauth::TokenStore;
//!
//! # async fn example(config: AutosaverConfig) -> Result<()> {
//! let store = TokenStore::in_home()?;
//! let prompt = |url: &str| -> autosaver_oauth::Result<String> {
//!     println!("Visit {}", url);
//!     Ok(String::new())
//! };
//! let bank = Bank::from_config(&config, &store, &prompt).await?;
//!
//! let balance = bank.get_balance().await?;
//! let goal = bank.get_goal_data().await?;
//! println!("{} in account, {} in '{}'", balance, goal.balance, goal.name);
//! # Ok(())
//! # }
//! ```

pub mod bank;
pub mod client;
pub mod error;
mod http;
pub mod money;
pub mod monzo;
pub mod starling;
pub mod types;

pub use bank::Bank;
pub use client::BankClient;
pub use error::{Error, Result};
pub use money::MoneyAmount;
pub use monzo::MonzoBank;
pub use starling::StarlingBank;
pub use types::{GoalData, IdempotencyKey, SaveResult};
