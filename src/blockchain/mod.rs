//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables / key file (private key, RPC API key)
//!     → wallet.rs (key detection, signing capability)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → transaction.rs (wait for confirmation, check receipt)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables or a key file
//! - Never log private keys or resolved RPC URLs
//! - All RPC reads have configurable timeouts

pub mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::ConfirmationPolicy;
pub use types::{BlockchainError, BlockchainResult, ChainId, TxOutcome};
pub use wallet::{KeySource, Wallet};
