//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the staking
//! client and the deploy tool. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder in `rpc_url` substituted with the network's API key.
pub const API_KEY_PLACEHOLDER: &str = "{api_key}";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StakingConfig {
    /// Network used when no `--network` flag is given.
    pub default_network: String,

    /// Named networks (e.g. `local`, `sepolia`).
    pub networks: BTreeMap<String, NetworkConfig>,

    /// Deployed staking contract.
    pub contract: ContractConfig,

    /// Signing key source and change detection.
    pub wallet: WalletConfig,

    /// Retry configuration for read calls.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Deployment script settings.
    pub deploy: DeployConfig,
}

impl Default for StakingConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert("local".to_string(), NetworkConfig::default());
        Self {
            default_network: "local".to_string(),
            networks,
            contract: ContractConfig::default(),
            wallet: WalletConfig::default(),
            retries: RetryConfig::default(),
            observability: ObservabilityConfig::default(),
            deploy: DeployConfig::default(),
        }
    }
}

impl StakingConfig {
    /// Look up a network by name, falling back to `default_network`.
    pub fn network(&self, name: Option<&str>) -> Option<&NetworkConfig> {
        self.networks.get(name.unwrap_or(&self.default_network))
    }
}

/// JSON-RPC network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL. May contain `{api_key}`.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 11155111 for Sepolia, 31337 for local Anvil/Hardhat).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Environment variable holding the RPC provider API key.
    pub api_key_env: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            api_key_env: None,
        }
    }
}

/// Staking contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed staking contract. The only place it is set.
    pub address: Option<String>,

    /// Confirmations to wait for after each mutating call.
    pub confirmations: u64,

    /// Upper bound on a confirmation wait. Unset waits indefinitely.
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: None,
            confirmations: 1,
            confirmation_timeout_secs: None,
        }
    }
}

/// Wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Environment variable holding the hex private key.
    pub private_key_env: String,

    /// Optional key file; takes precedence over the environment variable
    /// and is watched for account changes.
    pub key_file: Option<String>,

    /// Interval between chain ID polls in seconds.
    pub chain_poll_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_key_env: "STAKING_PRIVATE_KEY".to_string(),
            key_file: None,
            chain_poll_secs: 4,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format: `full` or `compact`.
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "full".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Deployment script configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Path to the compiled contract artifact (Hardhat JSON).
    pub artifact_path: String,

    /// Staked token address passed to the constructor.
    pub token_address: Option<String>,

    /// Reward rate in percent passed to the constructor.
    pub reward_rate_percent: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            artifact_path: "artifacts/contracts/Staking.sol/Staking.json".to_string(),
            token_address: None,
            reward_rate_percent: 10,
        }
    }
}
