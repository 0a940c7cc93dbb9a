//! Connector that builds sessions against a JSON-RPC network.

use alloy::primitives::Address;

use crate::blockchain::{BlockchainClient, BlockchainError, BlockchainResult, ConfirmationPolicy, KeySource, Wallet};
use crate::config::{NetworkConfig, RetryConfig, StakingConfig};
use crate::resilience::retries::retry_read;
use crate::session::{Connector, Session};
use crate::staking::StakingClient;

/// Builds a fresh session on every call, re-reading the key each time.
#[derive(Debug, Clone)]
pub struct RpcConnector {
    network: NetworkConfig,
    contract_address: Option<Address>,
    key_source: KeySource,
    policy: ConfirmationPolicy,
    retry: RetryConfig,
}

impl RpcConnector {
    pub fn new(config: &StakingConfig, network: &NetworkConfig) -> BlockchainResult<Self> {
        let contract_address = config
            .contract
            .address
            .as_deref()
            .map(|raw| {
                raw.parse::<Address>()
                    .map_err(|e| BlockchainError::Config(format!("contract.address: {}", e)))
            })
            .transpose()?;

        Ok(Self {
            network: network.clone(),
            contract_address,
            key_source: KeySource::from_config(&config.wallet),
            policy: ConfirmationPolicy::from_config(&config.contract),
            retry: config.retries.clone(),
        })
    }

    pub fn key_source(&self) -> &KeySource {
        &self.key_source
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

impl Connector for RpcConnector {
    type Contract = StakingClient;

    async fn connect(&self) -> BlockchainResult<Session<StakingClient>> {
        let contract_address = self.contract_address.ok_or_else(|| {
            BlockchainError::Config("contract.address is not set".to_string())
        })?;

        let wallet = Wallet::detect(&self.key_source)?;
        let address = wallet
            .request_accounts()
            .into_iter()
            .next()
            .ok_or_else(|| BlockchainError::WalletUnavailable("No authorized account".to_string()))?;

        let client = BlockchainClient::new(&self.network, Some(&wallet))?;
        // A chain mismatch is permanent and fails on the first attempt.
        let chain_id = retry_read(&self.retry, "chain_id", || client.verify_chain_id()).await?;
        let contract = StakingClient::new(contract_address, &client, self.policy);

        tracing::info!(
            address = %address,
            chain_id = %chain_id,
            contract = %contract_address,
            "Session connected"
        );

        Ok(Session {
            address,
            chain_id: chain_id.0,
            contract,
        })
    }
}
