//! Config file discovery.
//!
//! Resolution order (first hit wins):
//! 1. An explicit path (`--config`)
//! 2. `./autosaver.toml` (project-local)
//! 3. `~/.config/autosaver/config.toml` (XDG user config)

use std::path::{Path, PathBuf};

use crate::{AutosaverConfig, ConfigError, Result};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "autosaver.toml";

/// Default config filename within XDG config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "autosaver";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "AUTOSAVER_CONFIG_DIR";

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: AutosaverConfig,
    /// File the configuration was read from.
    pub source: PathBuf,
    /// Warnings generated during loading (e.g., plaintext secrets).
    pub warnings: Vec<String>,
}

/// Load configuration, honouring an explicit path when given.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(explicit, None, None)
}

/// Load configuration with explicit control over the searched directories.
///
/// `project_dir` replaces the current directory and `config_dir` replaces
/// both `AUTOSAVER_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(
    explicit: Option<&Path>,
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => {
            let mut paths = vec![
                project_dir
                    .map(|d| d.join(PROJECT_CONFIG_FILE))
                    .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE)),
            ];
            let user_path = match config_dir {
                Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
                None => xdg_config_path(),
            };
            paths.extend(user_path);
            paths
        }
    };

    // An explicit path is read even if missing, so the error names it.
    let source = match explicit {
        Some(path) => path.to_path_buf(),
        None => candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or(ConfigError::NotFound {
                searched: candidates.clone(),
            })?,
    };

    let config = load_config_file(&source)?;
    let warnings = plaintext_warnings(&config);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!("Loaded config from {}", source.display());

    Ok(LoadedConfig {
        config,
        source,
        warnings,
    })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<AutosaverConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    AutosaverConfig::from_toml(&contents)
}

/// Get the XDG config file path for autosaver.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Get the XDG config directory for autosaver.
///
/// Checks `AUTOSAVER_CONFIG_DIR` env var first, then falls back to platform default.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

fn plaintext_warnings(config: &AutosaverConfig) -> Vec<String> {
    config
        .plaintext_secrets()
        .into_iter()
        .map(|section| {
            format!(
                "[{}] contains a plaintext secret. Consider using an environment variable instead.",
                section
            )
        })
        .collect()
}
