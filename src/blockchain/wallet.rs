//! Wallet detection and the signing capability.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or a key file
//! - Keys are never logged or serialized
//! - A missing key is `WalletUnavailable`, never a silent hang

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::path::{Path, PathBuf};

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::WalletConfig;

/// Where the signing key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Environment variable holding a hex key.
    Env(String),
    /// File whose trimmed contents are a hex key.
    File(PathBuf),
}

impl KeySource {
    /// Key file wins over the environment variable when both are configured.
    pub fn from_config(config: &WalletConfig) -> Self {
        match &config.key_file {
            Some(path) => KeySource::File(PathBuf::from(path)),
            None => KeySource::Env(config.private_key_env.clone()),
        }
    }
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Env(var) => write!(f, "env:{}", var),
            KeySource::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// An authorized wallet: one address plus its signer.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self { signer })
    }

    /// Detect the wallet from the given source.
    ///
    /// An absent variable or file is `WalletUnavailable`; a present but
    /// malformed key is `Wallet`.
    pub fn detect(source: &KeySource) -> BlockchainResult<Self> {
        let wallet = match source {
            KeySource::Env(var) => {
                let key = std::env::var(var)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| {
                        BlockchainError::WalletUnavailable(format!(
                            "Environment variable {} not set",
                            var
                        ))
                    })?;
                Self::from_private_key(&key)?
            }
            KeySource::File(path) => Self::from_key_file(path)?,
        };

        tracing::info!(address = %wallet.address(), source = %source, "Wallet detected");
        Ok(wallet)
    }

    /// Read the key from a file.
    pub fn from_key_file(path: &Path) -> BlockchainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BlockchainError::WalletUnavailable(format!("Key file {}: {}", path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Err(BlockchainError::WalletUnavailable(format!(
                "Key file {} is empty",
                path.display()
            )));
        }
        Self::from_private_key(&content)
    }

    /// Authorized accounts. A key wallet authorizes exactly one.
    pub fn request_accounts(&self) -> Vec<Address> {
        vec![self.address()]
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The signing capability.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Signer wrapped for use in a provider's wallet filler.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
