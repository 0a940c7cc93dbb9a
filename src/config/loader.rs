//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{NetworkConfig, StakingConfig, API_KEY_PLACEHOLDER};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    UnknownNetwork(String),
    MissingEnv(String),
    InvalidUrl(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::UnknownNetwork(name) => write!(f, "Unknown network '{}'", name),
            ConfigError::MissingEnv(var) => {
                write!(f, "Environment variable {} not set", var)
            }
            ConfigError::InvalidUrl(msg) => write!(f, "Invalid RPC URL: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<StakingConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: StakingConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the file if it exists, otherwise fall back to defaults.
pub fn load_or_default(path: &Path) -> Result<StakingConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = ?path, "Config file not found, using defaults");
        Ok(StakingConfig::default())
    }
}

/// Pick the named network (or the default one).
pub fn select_network<'a>(
    config: &'a StakingConfig,
    name: Option<&str>,
) -> Result<&'a NetworkConfig, ConfigError> {
    config.network(name).ok_or_else(|| {
        ConfigError::UnknownNetwork(name.unwrap_or(&config.default_network).to_string())
    })
}

/// Resolve the RPC URL, substituting the API key from the environment.
pub fn resolve_rpc_url(network: &NetworkConfig) -> Result<url::Url, ConfigError> {
    resolve_rpc_url_with(network, |var| std::env::var(var).ok())
}

/// Resolve the RPC URL with a custom environment lookup.
pub fn resolve_rpc_url_with<F>(network: &NetworkConfig, lookup: F) -> Result<url::Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    resolve_url_with(&network.rpc_url, network, &lookup)
}

/// Resolve failover URLs; invalid ones are skipped with a warning.
pub fn resolve_failover_urls(network: &NetworkConfig) -> Vec<url::Url> {
    let lookup = |var: &str| std::env::var(var).ok();
    network
        .failover_urls
        .iter()
        .filter_map(|raw| match resolve_url_with(raw, network, &lookup) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid failover RPC URL");
                None
            }
        })
        .collect()
}

fn resolve_url_with<F>(raw: &str, network: &NetworkConfig, lookup: &F) -> Result<url::Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = if raw.contains(API_KEY_PLACEHOLDER) {
        let var = network
            .api_key_env
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnv("api_key_env (not configured)".to_string()))?;
        let key = lookup(var)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingEnv(var.to_string()))?;
        raw.replace(API_KEY_PLACEHOLDER, &key)
    } else {
        raw.to_string()
    };

    // The key must not leak through error messages.
    expanded
        .parse::<url::Url>()
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sepolia() -> NetworkConfig {
        NetworkConfig {
            rpc_url: "https://eth-sepolia.g.alchemy.com/v2/{api_key}".to_string(),
            chain_id: 11155111,
            api_key_env: Some("ALCHEMY_API_KEY".to_string()),
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn test_api_key_substitution() {
        let url = resolve_rpc_url_with(&sepolia(), |var| {
            assert_eq!(var, "ALCHEMY_API_KEY");
            Some("abc123".to_string())
        })
        .unwrap();
        assert_eq!(url.as_str(), "https://eth-sepolia.g.alchemy.com/v2/abc123");
    }

    #[test]
    fn test_missing_api_key() {
        let err = resolve_rpc_url_with(&sepolia(), |_| None).unwrap_err();
        assert!(err.to_string().contains("ALCHEMY_API_KEY"));

        let err = resolve_rpc_url_with(&sepolia(), |_| Some(String::new())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(_)));
    }

    #[test]
    fn test_plain_url_needs_no_env() {
        let url = resolve_rpc_url_with(&NetworkConfig::default(), |_| None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8545/");
    }

    #[test]
    fn test_unknown_network() {
        let config = StakingConfig::default();
        assert!(select_network(&config, None).is_ok());
        let err = select_network(&config, Some("mainnet")).unwrap_err();
        assert_eq!(err.to_string(), "Unknown network 'mainnet'");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("staking-client-does-not-exist.toml");
        let config = load_or_default(&path).unwrap();
        assert_eq!(config.default_network, "local");
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_example_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("staking.example.toml");
        let config = load_config(&path).unwrap();
        let sepolia = select_network(&config, Some("sepolia")).unwrap();
        assert_eq!(sepolia.chain_id, 11155111);
        assert_eq!(config.deploy.reward_rate_percent, 10);
        assert!(config.contract.address.is_some());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("staking-client-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "default_network = \"nowhere\"\n").unwrap();
        let result = load_config(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
