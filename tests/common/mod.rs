//! Shared in-memory chain for integration tests.

use alloy::primitives::{Address, TxHash, U256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use staking_client::blockchain::{BlockchainError, BlockchainResult, TxOutcome};
use staking_client::session::{Connector, Session};
use staking_client::staking::{StakerRecord, StakingContract};

/// State shared by the mock connector and every contract handle it hands out.
pub struct MockChain {
    records: Mutex<HashMap<Address, StakerRecord>>,
    wallet: Mutex<Option<Address>>,
    pub connects: AtomicUsize,
    pub submissions: AtomicUsize,
    pub fail_next_submit: AtomicBool,
    hold: AtomicBool,
    gate: Semaphore,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            records: Mutex::default(),
            wallet: Mutex::default(),
            connects: AtomicUsize::default(),
            submissions: AtomicUsize::default(),
            fail_next_submit: AtomicBool::default(),
            hold: AtomicBool::default(),
            gate: Semaphore::new(0),
        }
    }
}

#[allow(dead_code)]
impl MockChain {
    pub fn with_wallet(address: Address) -> Arc<Self> {
        let chain = Self::default();
        *chain.wallet.lock().unwrap() = Some(address);
        Arc::new(chain)
    }

    pub fn without_wallet() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_wallet(&self, address: Option<Address>) {
        *self.wallet.lock().unwrap() = address;
    }

    pub fn set_record(&self, address: Address, record: StakerRecord) {
        self.records.lock().unwrap().insert(address, record);
    }

    pub fn record(&self, address: Address) -> StakerRecord {
        self.records.lock().unwrap().get(&address).copied().unwrap_or_default()
    }

    /// Block submissions until [`MockChain::release`] is called.
    pub fn hold_submissions(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    fn apply(&self, staker: Address, f: impl FnOnce(&mut StakerRecord) -> BlockchainResult<()>) -> BlockchainResult<TxOutcome> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_next_submit.swap(false, Ordering::SeqCst) {
            return Err(BlockchainError::Reverted(format!("mock tx {}", n)));
        }
        let mut records = self.records.lock().unwrap();
        f(records.entry(staker).or_default())?;
        Ok(TxOutcome {
            tx_hash: TxHash::with_last_byte(n as u8),
            block_number: Some(n as u64),
        })
    }
}

/// Contract handle bound to one staker.
pub struct MockStaking {
    chain: Arc<MockChain>,
    staker: Address,
}

impl MockStaking {
    async fn wait_gate(&self) {
        if self.chain.hold.load(Ordering::SeqCst) {
            if let Ok(permit) = self.chain.gate.acquire().await {
                permit.forget();
            }
        }
    }
}

impl StakingContract for MockStaking {
    async fn stakers(&self, staker: Address) -> BlockchainResult<StakerRecord> {
        Ok(self.chain.record(staker))
    }

    async fn stake(&self, amount: U256) -> BlockchainResult<TxOutcome> {
        self.wait_gate().await;
        self.chain.apply(self.staker, |r| {
            r.total_staked += amount;
            Ok(())
        })
    }

    async fn unstake(&self, amount: U256) -> BlockchainResult<TxOutcome> {
        self.wait_gate().await;
        self.chain.apply(self.staker, |r| {
            if r.total_staked < amount {
                return Err(BlockchainError::Reverted("insufficient stake".to_string()));
            }
            r.total_staked -= amount;
            Ok(())
        })
    }

    async fn claim_reward(&self) -> BlockchainResult<TxOutcome> {
        self.wait_gate().await;
        self.chain.apply(self.staker, |r| {
            r.reward = U256::ZERO;
            Ok(())
        })
    }
}

pub struct MockConnector {
    pub chain: Arc<MockChain>,
}

impl Connector for MockConnector {
    type Contract = MockStaking;

    async fn connect(&self) -> BlockchainResult<Session<MockStaking>> {
        self.chain.connects.fetch_add(1, Ordering::SeqCst);
        let address = (*self.chain.wallet.lock().unwrap())
            .ok_or_else(|| BlockchainError::WalletUnavailable("no injected wallet".to_string()))?;
        Ok(Session {
            address,
            chain_id: 31337,
            contract: MockStaking {
                chain: self.chain.clone(),
                staker: address,
            },
        })
    }
}
