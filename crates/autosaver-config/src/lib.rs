//! Configuration system for autosaver.
//!
//! Provides TOML-based configuration with:
//! - Provider selection (`use = "starling"` or `use = "monzo"`)
//! - The linear monthly budget (`start_month_with`, `end_month_with`)
//! - Per-provider sections (`[starling]`, `[monzo]`)
//! - Secret resolution (env var → config file)
//!
//! Money values are written as decimal strings and parsed into
//! [`rust_decimal::Decimal`], never through a float.

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use secrets::{ResolvedSecret, SecretSource, resolve_secret};
pub use types::*;
