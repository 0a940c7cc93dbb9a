//! Long-lived wallet change listener.
//!
//! Owns the current [`WalletSubscription`] and restarts it after every
//! event, seeded with the last chain and account seen, whether or not the
//! following reconnect succeeds.

use alloy::primitives::Address;

use crate::session::events::{WalletEvent, WalletSubscription};
use crate::session::watcher::WalletWatcher;
use crate::session::SessionInfo;

pub struct WalletListener {
    watcher: WalletWatcher,
    chain: Option<u64>,
    account: Option<Address>,
    subscription: Option<WalletSubscription>,
}

impl WalletListener {
    /// Not started until [`WalletListener::restart`].
    pub fn new(watcher: WalletWatcher) -> Self {
        Self {
            watcher,
            chain: None,
            account: None,
            subscription: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Last chain and account the sources were seeded with.
    pub fn seeds(&self) -> (Option<u64>, Option<Address>) {
        (self.chain, self.account)
    }

    /// Drop the old sources and start fresh ones from the current seeds.
    pub fn restart(&mut self) -> Result<(), notify::Error> {
        if let Some(old) = self.subscription.take() {
            old.unsubscribe();
        }
        self.subscription = Some(self.watcher.start(self.chain, self.account)?);
        Ok(())
    }

    /// Reseed from a connected session; restarts only if something moved.
    pub fn observe(&mut self, info: SessionInfo) {
        if self.is_listening() && self.seeds() == (Some(info.chain_id), Some(info.address)) {
            return;
        }
        self.chain = Some(info.chain_id);
        self.account = Some(info.address);
        self.restart_or_log();
    }

    /// Next wallet event. Pending forever while not listening.
    pub async fn next_event(&mut self) -> Option<WalletEvent> {
        let event = match self.subscription.as_mut() {
            Some(subscription) => subscription.recv().await?,
            None => std::future::pending().await,
        };

        match event {
            WalletEvent::ChainChanged { to, .. } => self.chain = Some(to),
            WalletEvent::AccountsChanged { to, .. } => self.account = to,
        }
        self.restart_or_log();
        Some(event)
    }

    fn restart_or_log(&mut self) {
        if let Err(e) = self.restart() {
            tracing::error!(error = %e, "Failed to watch wallet changes");
        }
    }
}
