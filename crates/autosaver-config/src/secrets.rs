//! Secret resolution for provider credentials.
//!
//! Resolution order:
//! 1. Environment variable
//! 2. Config file (with warning at load time)

/// Result of secret resolution with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext).
    ConfigFile,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
        }
    }
}

/// Resolve a secret from `env_var`, falling back to the config file value.
///
/// Empty values count as unset at both levels.
pub fn resolve_secret(env_var: &str, config_value: Option<&str>) -> Option<ResolvedSecret> {
    let from_env = std::env::var(env_var).ok();
    resolve_from(env_var, from_env, config_value)
}

fn resolve_from(
    env_var: &str,
    env_value: Option<String>,
    config_value: Option<&str>,
) -> Option<ResolvedSecret> {
    if let Some(value) = env_value
        && !value.is_empty()
    {
        return Some(ResolvedSecret {
            value,
            source: SecretSource::EnvVar(env_var.to_string()),
        });
    }

    config_value
        .filter(|v| !v.is_empty())
        .map(|v| ResolvedSecret {
            value: v.to_string(),
            source: SecretSource::ConfigFile,
        })
}
