//! Confirmation monitoring for submitted transactions.
//!
//! # Responsibilities
//! - Poll for the receipt until the transaction reaches the required depth
//! - Turn reverted receipts into errors
//! - Bound the wait only when a timeout is configured

use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionReceipt;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::blockchain::types::{BlockchainError, BlockchainResult, TxOutcome};

/// Delay between receipt polls.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// How long and how deep to wait for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Blocks required on top of inclusion (1 = included).
    pub confirmations: u64,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            confirmations: 1,
            timeout: None,
        }
    }
}

impl ConfirmationPolicy {
    pub fn from_config(config: &crate::config::ContractConfig) -> Self {
        Self {
            confirmations: config.confirmations.max(1),
            timeout: config.confirmation_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Wait for a submitted transaction and return its receipt.
pub async fn wait_for_receipt(
    provider: &DynProvider,
    tx_hash: TxHash,
    policy: ConfirmationPolicy,
) -> BlockchainResult<TransactionReceipt> {
    tracing::debug!(
        tx_hash = %tx_hash,
        confirmations = policy.confirmations,
        "Waiting for confirmation"
    );

    match policy.timeout {
        Some(limit) => timeout(limit, poll_receipt(provider, tx_hash, policy.confirmations))
            .await
            .map_err(|_| BlockchainError::ConfirmationTimeout(tx_hash))?,
        None => poll_receipt(provider, tx_hash, policy.confirmations).await,
    }
}

async fn poll_receipt(
    provider: &DynProvider,
    tx_hash: TxHash,
    confirmations: u64,
) -> BlockchainResult<TransactionReceipt> {
    loop {
        let receipt = provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| BlockchainError::Rpc(format!("Receipt for {} unavailable: {}", tx_hash, e)))?;

        match receipt {
            None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
            Some(receipt) => {
                check_status(&receipt)?;
                let Some(included) = receipt.block_number.filter(|_| confirmations > 1) else {
                    return Ok(receipt);
                };
                let current = provider
                    .get_block_number()
                    .await
                    .map_err(|e| BlockchainError::Rpc(format!("Block number unavailable: {}", e)))?;
                if current + 1 >= included + confirmations {
                    return Ok(receipt);
                }
                tracing::debug!(
                    tx_hash = %tx_hash,
                    depth = (current + 1).saturating_sub(included),
                    confirmations,
                    "Waiting for more confirmations"
                );
            }
        }

        sleep(RECEIPT_POLL_INTERVAL).await;
    }
}

/// Reject receipts whose execution failed.
pub fn check_status(receipt: &TransactionReceipt) -> BlockchainResult<()> {
    if receipt.status() {
        Ok(())
    } else {
        Err(BlockchainError::Reverted(receipt.transaction_hash.to_string()))
    }
}

/// Wait for a submitted transaction and summarize it.
pub async fn confirm(
    provider: &DynProvider,
    tx_hash: TxHash,
    policy: ConfirmationPolicy,
) -> BlockchainResult<TxOutcome> {
    let receipt = wait_for_receipt(provider, tx_hash, policy).await?;
    let outcome = TxOutcome {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
    };
    tracing::info!(
        tx_hash = %outcome.tx_hash,
        block_number = ?outcome.block_number,
        "Transaction confirmed"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock;
    use crate::config::ContractConfig;
    use alloy::primitives::U64;
    use alloy::transports::mock::Asserter;

    #[test]
    fn test_policy_from_config() {
        let policy = ConfirmationPolicy::from_config(&ContractConfig::default());
        assert_eq!(policy, ConfirmationPolicy::default());

        let policy = ConfirmationPolicy::from_config(&ContractConfig {
            address: None,
            confirmations: 0,
            confirmation_timeout_secs: Some(120),
        });
        assert_eq!(policy.confirmations, 1);
        assert_eq!(policy.timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_check_status() {
        let hash = TxHash::repeat_byte(0x01);
        assert!(check_status(&mock::receipt(hash, true, 5)).is_ok());

        let err = check_status(&mock::receipt(hash, false, 5)).unwrap_err();
        assert!(matches!(err, BlockchainError::Reverted(ref h) if h == &hash.to_string()));
    }

    #[tokio::test]
    async fn test_mined_receipt_confirms() {
        let asserter = Asserter::new();
        let client = mock::client(&asserter);
        let hash = TxHash::repeat_byte(0x02);
        asserter.push_success(&mock::receipt(hash, true, 9));

        let outcome = confirm(client.provider(), hash, ConfirmationPolicy::default())
            .await
            .unwrap();
        assert_eq!(outcome.tx_hash, hash);
        assert_eq!(outcome.block_number, Some(9));
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_error() {
        let asserter = Asserter::new();
        let client = mock::client(&asserter);
        let hash = TxHash::repeat_byte(0x03);
        asserter.push_success(&mock::receipt(hash, false, 9));

        let err = wait_for_receipt(client.provider(), hash, ConfirmationPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Reverted(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_inclusion_and_depth() {
        let asserter = Asserter::new();
        let client = mock::client(&asserter);
        let hash = TxHash::repeat_byte(0x04);
        let policy = ConfirmationPolicy {
            confirmations: 3,
            timeout: None,
        };

        // Pending, then included at 10 with tip 11 (depth 2), then tip 12.
        asserter.push_success(&Option::<TransactionReceipt>::None);
        asserter.push_success(&mock::receipt(hash, true, 10));
        asserter.push_success(&U64::from(11));
        asserter.push_success(&mock::receipt(hash, true, 10));
        asserter.push_success(&U64::from(12));

        let receipt = wait_for_receipt(client.provider(), hash, policy).await.unwrap();
        assert_eq!(receipt.block_number, Some(10));
        assert!(asserter.read_q().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_when_never_mined() {
        let asserter = Asserter::new();
        let client = mock::client(&asserter);
        let hash = TxHash::repeat_byte(0x05);
        for _ in 0..10 {
            asserter.push_success(&Option::<TransactionReceipt>::None);
        }
        let policy = ConfirmationPolicy {
            confirmations: 1,
            timeout: Some(Duration::from_secs(5)),
        };

        let err = wait_for_receipt(client.provider(), hash, policy).await.unwrap_err();
        assert!(matches!(err, BlockchainError::ConfirmationTimeout(h) if h == hash));
    }
}
