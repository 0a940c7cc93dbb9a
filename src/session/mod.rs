//! Wallet session lifecycle.
//!
//! # Data Flow
//! ```text
//! Connector::connect (detect wallet, verify chain, bind contract)
//!     → Session { address, chain_id, contract }
//!     → SessionSlot (atomic swap, read by effect tasks)
//!
//! On chainChanged / accountsChanged:
//!     watcher.rs emits WalletEvent
//!     → view discards the session (SessionSlot::clear)
//!     → Connector::connect rebuilds it in place
//!     → listener.rs restarts the sources from the new chain/account
//! ```

pub mod connector;
pub mod events;
pub mod listener;
pub mod watcher;

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;
use std::future::Future;
use std::sync::Arc;

use crate::blockchain::BlockchainResult;
use crate::staking::StakingContract;

pub use connector::RpcConnector;
pub use events::{WalletEvent, WalletEventHub, WalletSubscription};
pub use listener::WalletListener;
pub use watcher::WalletWatcher;

/// A connected wallet bound to the staking contract.
#[derive(Debug)]
pub struct Session<C> {
    pub address: Address,
    pub chain_id: u64,
    pub contract: C,
}

/// Identity of a session, without the contract handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    pub address: Address,
    pub chain_id: u64,
}

impl<C> Session<C> {
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            address: self.address,
            chain_id: self.chain_id,
        }
    }
}

/// Builds sessions.
pub trait Connector: Send + Sync + 'static {
    type Contract: StakingContract;

    /// Detect the wallet, authorize its account and bind the contract.
    fn connect(&self) -> impl Future<Output = BlockchainResult<Session<Self::Contract>>> + Send;
}

/// The current session, shared between the view loop and effect tasks.
pub struct SessionSlot<C> {
    current: ArcSwapOption<Session<C>>,
}

impl<C> SessionSlot<C> {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::const_empty(),
        }
    }

    pub fn load(&self) -> Option<Arc<Session<C>>> {
        self.current.load_full()
    }

    pub fn store(&self, session: Session<C>) {
        self.current.store(Some(Arc::new(session)));
    }

    /// Discard the session; in-flight tasks keep their own snapshot.
    pub fn clear(&self) {
        self.current.store(None);
    }
}

impl<C> Default for SessionSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}
