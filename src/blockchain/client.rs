//! Blockchain RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (primary + failovers)
//! - Attach the wallet's signer so contract calls can be signed
//! - Query the chain ID with timeouts
//! - Verify the connected chain matches configuration

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;
use crate::config::loader::{resolve_failover_urls, resolve_rpc_url};
use crate::config::NetworkConfig;
use crate::observability::metrics;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Network configuration.
    network: NetworkConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a client, signing with `wallet` when given.
    ///
    /// Does not touch the network; use [`BlockchainClient::verify_chain_id`].
    pub fn new(network: &NetworkConfig, wallet: Option<&Wallet>) -> BlockchainResult<Self> {
        let primary = resolve_rpc_url(network).map_err(|e| BlockchainError::Config(e.to_string()))?;

        let mut providers = Vec::new();
        for url in std::iter::once(primary).chain(resolve_failover_urls(network)) {
            let provider = match wallet {
                Some(wallet) => ProviderBuilder::new()
                    .wallet(wallet.ethereum_wallet())
                    .connect_http(url)
                    .erased(),
                None => ProviderBuilder::new().connect_http(url).erased(),
            };
            providers.push(provider);
        }

        tracing::debug!(
            chain_id = network.chain_id,
            providers = providers.len(),
            signing = wallet.is_some(),
            "Blockchain client created"
        );

        Self::from_providers(network, providers)
    }

    /// Create a client over already-built providers, primary first.
    pub fn from_providers(network: &NetworkConfig, providers: Vec<DynProvider>) -> BlockchainResult<Self> {
        if providers.is_empty() {
            return Err(BlockchainError::Config("at least one provider is required".to_string()));
        }
        Ok(Self {
            providers,
            network: network.clone(),
            timeout_duration: Duration::from_secs(network.rpc_timeout_secs),
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<ChainId> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.network.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.network.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(chain_id)
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let mut timed_out = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                    timed_out += 1;
                }
            }
        }
        metrics::record_rpc_failure("chain_id");
        Err(self.exhausted(timed_out, "All RPC providers failed"))
    }

    /// Error for a read that failed on every provider.
    ///
    /// `Timeout` only when every provider timed out.
    pub(crate) fn exhausted(&self, timed_out: usize, message: &str) -> BlockchainError {
        if timed_out == self.providers.len() {
            BlockchainError::Timeout(self.timeout_duration.as_secs())
        } else {
            BlockchainError::Rpc(message.to_string())
        }
    }

    /// Get the underlying primary provider. Transactions go through it.
    pub fn provider(&self) -> &DynProvider {
        &self.providers[0]
    }

    /// All providers, primary first.
    pub fn providers(&self) -> &[DynProvider] {
        &self.providers
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Per-request timeout.
    pub fn timeout_duration(&self) -> Duration {
        self.timeout_duration
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rpc_url may hold an API key after substitution; log the template.
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.network.rpc_url)
            .field("chain_id", &self.network.chain_id)
            .field("timeout_secs", &self.network.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock;
    use alloy::primitives::U64;
    use alloy::transports::mock::Asserter;

    fn test_network() -> NetworkConfig {
        NetworkConfig {
            // Nothing listens on port 9 (discard); calls fail fast.
            rpc_url: "http://127.0.0.1:9".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 2,
            ..NetworkConfig::default()
        }
    }

    #[tokio::test]
    async fn test_client_creation_is_offline() {
        let client = BlockchainClient::new(&test_network(), None).unwrap();
        assert_eq!(client.providers().len(), 1);
        assert_eq!(client.timeout_duration(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_rpc_failover() {
        let mut network = test_network();
        network.failover_urls.push("http://127.0.0.1:10".to_string());
        network.failover_urls.push("not a url".to_string());

        let client = BlockchainClient::new(&network, None).unwrap();
        // The invalid failover URL is dropped.
        assert_eq!(client.providers().len(), 2);

        let result = client.get_chain_id().await;
        assert!(result.unwrap_err().to_string().contains("All RPC providers failed"));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let network = NetworkConfig {
            rpc_url: "https://eth-sepolia.g.alchemy.com/v2/{api_key}".to_string(),
            api_key_env: Some("STAKING_CLIENT_TEST_UNSET_API_KEY".to_string()),
            ..NetworkConfig::default()
        };
        let err = BlockchainClient::new(&network, None).unwrap_err();
        assert!(matches!(err, BlockchainError::Config(_)));
    }

    #[test]
    fn test_from_providers_requires_one() {
        let err = BlockchainClient::from_providers(&test_network(), Vec::new()).unwrap_err();
        assert!(matches!(err, BlockchainError::Config(_)));
    }

    #[tokio::test]
    async fn test_verify_chain_id() {
        let asserter = Asserter::new();
        let client = mock::client(&asserter);

        asserter.push_success(&U64::from(31337));
        assert_eq!(client.verify_chain_id().await.unwrap(), ChainId(31337));

        asserter.push_success(&U64::from(1));
        let err = client.verify_chain_id().await.unwrap_err();
        assert!(matches!(err, BlockchainError::ChainMismatch { expected: 31337, actual: 1 }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_unanswered_rpc_is_timeout() {
        // Accepts connections and never replies.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let network = NetworkConfig {
            rpc_url: format!("http://{}", addr),
            rpc_timeout_secs: 1,
            ..NetworkConfig::default()
        };
        let client = BlockchainClient::new(&network, None).unwrap();

        let err = client.get_chain_id().await.unwrap_err();
        assert!(matches!(err, BlockchainError::Timeout(1)));
        assert!(err.is_transient());
    }
}
