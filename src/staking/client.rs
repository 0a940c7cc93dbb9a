//! RPC-backed staking contract client.
//!
//! # Responsibilities
//! - Read `stakers(address)` with timeout and failover across providers
//! - Send `stake`/`unstake`/`claimReward` through the primary (signing) provider
//! - Wait for confirmation before resolving

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder};
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::transaction::{confirm, ConfirmationPolicy};
use crate::blockchain::types::{BlockchainError, BlockchainResult, TxOutcome};
use crate::blockchain::BlockchainClient;
use crate::observability::metrics;
use crate::staking::contract::{IStaking, StakingContract};
use crate::staking::types::{StakerRecord, TxKind};

type Instance = IStaking::IStakingInstance<DynProvider>;

/// Staking contract bound to an address and a signing provider.
#[derive(Clone)]
pub struct StakingClient {
    address: Address,
    /// Primary instance first; reads fail over in order.
    instances: Vec<Instance>,
    /// Signing provider used for submissions and receipts.
    provider: DynProvider,
    timeout_duration: Duration,
    policy: ConfirmationPolicy,
}

impl StakingClient {
    pub fn new(address: Address, client: &BlockchainClient, policy: ConfirmationPolicy) -> Self {
        let instances = client
            .providers()
            .iter()
            .map(|provider| IStaking::new(address, provider.clone()))
            .collect();

        Self {
            address,
            instances,
            provider: client.provider().clone(),
            timeout_duration: client.timeout_duration(),
            policy,
        }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    fn primary(&self) -> &Instance {
        &self.instances[0]
    }

    async fn finish(
        &self,
        kind: TxKind,
        sent: Result<PendingTransactionBuilder<Ethereum>, alloy::contract::Error>,
    ) -> BlockchainResult<TxOutcome> {
        let pending = sent.map_err(|e| {
            metrics::record_rpc_failure(kind.as_str());
            BlockchainError::Contract(format!("{} submission failed: {}", kind, e))
        })?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, kind = %kind, "Transaction submitted");
        confirm(&self.provider, tx_hash, self.policy).await
    }
}

impl StakingContract for StakingClient {
    async fn stakers(&self, staker: Address) -> BlockchainResult<StakerRecord> {
        let mut timed_out = 0;
        for (i, instance) in self.instances.iter().enumerate() {
            let call = instance.stakers(staker);
            match timeout(self.timeout_duration, call.call()).await {
                Ok(Ok(ret)) => {
                    return Ok(StakerRecord {
                        total_staked: ret.totalStaked,
                        reward: ret.reward,
                    })
                }
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "stakers() call failed"),
                Err(_) => {
                    tracing::warn!(provider_idx = i, "stakers() call timed out");
                    timed_out += 1;
                }
            }
        }
        metrics::record_rpc_failure("stakers");
        if timed_out == self.instances.len() {
            return Err(BlockchainError::Timeout(self.timeout_duration.as_secs()));
        }
        Err(BlockchainError::Rpc("All providers failed to read staker record".to_string()))
    }

    async fn stake(&self, amount: U256) -> BlockchainResult<TxOutcome> {
        let call = self.primary().stake(amount);
        self.finish(TxKind::Stake, call.send().await).await
    }

    async fn unstake(&self, amount: U256) -> BlockchainResult<TxOutcome> {
        let call = self.primary().unstake(amount);
        self.finish(TxKind::Unstake, call.send().await).await
    }

    async fn claim_reward(&self) -> BlockchainResult<TxOutcome> {
        let call = self.primary().claimReward();
        self.finish(TxKind::Claim, call.send().await).await
    }
}

impl std::fmt::Debug for StakingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StakingClient")
            .field("address", &self.address)
            .field("providers", &self.instances.len())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock;
    use crate::config::NetworkConfig;
    use alloy::primitives::{Bytes, TxHash};
    use alloy::sol_types::SolValue;
    use alloy::transports::mock::Asserter;

    const WEI: u128 = 1_000_000_000_000_000_000;

    fn offline_client() -> StakingClient {
        let network = NetworkConfig {
            rpc_url: "http://127.0.0.1:9".to_string(),
            rpc_timeout_secs: 2,
            ..NetworkConfig::default()
        };
        let client = BlockchainClient::new(&network, None).unwrap();
        StakingClient::new(Address::repeat_byte(0x11), &client, ConfirmationPolicy::default())
    }

    #[tokio::test]
    async fn test_unreachable_read_is_transient() {
        let staking = offline_client();
        assert_eq!(staking.address(), Address::repeat_byte(0x11));

        let err = staking.stakers(Address::ZERO).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_unreachable_submit_is_contract_error() {
        let err = offline_client().claim_reward().await.unwrap_err();
        assert!(matches!(err, BlockchainError::Contract(_)));
        assert!(err.to_string().contains("claim submission failed"));
    }

    fn mocked(asserter: &Asserter) -> StakingClient {
        StakingClient::new(
            Address::repeat_byte(0x11),
            &mock::client(asserter),
            ConfirmationPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_stakers_decodes_record() {
        let asserter = Asserter::new();
        let staking = mocked(&asserter);
        let encoded = (U256::from(3 * WEI / 2), U256::from(WEI / 10)).abi_encode_params();
        asserter.push_success(&Bytes::from(encoded));

        let record = staking.stakers(Address::repeat_byte(0x42)).await.unwrap();
        assert_eq!(record.total_staked_display(), "1.5");
        assert_eq!(record.reward_display(), "0.1");
    }

    #[tokio::test]
    async fn test_stake_is_confirmed() {
        let asserter = Asserter::new();
        let staking = mocked(&asserter);
        let hash = TxHash::repeat_byte(0x0a);
        asserter.push_success(&hash);
        asserter.push_success(&mock::receipt(hash, true, 12));

        let outcome = staking.stake(U256::from(WEI)).await.unwrap();
        assert_eq!(outcome.tx_hash, hash);
        assert_eq!(outcome.block_number, Some(12));
    }

    #[tokio::test]
    async fn test_reverted_claim_is_error() {
        let asserter = Asserter::new();
        let staking = mocked(&asserter);
        let hash = TxHash::repeat_byte(0x0b);
        asserter.push_success(&hash);
        asserter.push_success(&mock::receipt(hash, false, 12));

        let err = staking.claim_reward().await.unwrap_err();
        assert!(matches!(err, BlockchainError::Reverted(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_rejected_submission_is_contract_error() {
        let asserter = Asserter::new();
        let staking = mocked(&asserter);
        asserter.push_failure_msg("execution reverted: insufficient stake");

        let err = staking.unstake(U256::from(WEI)).await.unwrap_err();
        assert!(err.to_string().contains("unstake submission failed"));
    }

    #[tokio::test]
    async fn test_unanswered_read_is_timeout() {
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
        let staking = StakingClient::new(Address::repeat_byte(0x11), &client, ConfirmationPolicy::default());

        let err = staking.stakers(Address::ZERO).await.unwrap_err();
        assert!(matches!(err, BlockchainError::Timeout(1)));
    }
}
