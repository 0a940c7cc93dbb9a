//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! staking.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → StakingConfig (validated, immutable)
//!     → loader.rs resolves the selected network's RPC URL from env
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Secrets (API key, private key) come from the environment, never the file
//! - The contract address has exactly one home: `contract.address`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, resolve_rpc_url, select_network, ConfigError};
pub use schema::{
    ContractConfig, DeployConfig, NetworkConfig, ObservabilityConfig, RetryConfig, StakingConfig,
    WalletConfig,
};
