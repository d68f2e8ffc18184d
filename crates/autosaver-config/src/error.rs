//! Configuration error types.

use std::path::PathBuf;

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No config file at any of the searched locations.
    #[error("no config file found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    /// `use` is missing or empty.
    #[error("no provider selected. Set `use` to either \"starling\" or \"monzo\"")]
    NoProvider,

    /// `use` names a provider we don't support.
    #[error("unknown provider '{0}'. Set `use` to either \"starling\" or \"monzo\"")]
    UnknownProvider(String),

    /// The selected provider has no config section.
    #[error("provider '{provider}' selected but the [{provider}] section is missing")]
    MissingSection { provider: String },

    /// Missing required field.
    #[error("missing required field '{field}' in [{section}]")]
    MissingField { field: String, section: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
