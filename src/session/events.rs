//! Wallet change notifications.
//!
//! Events fan out over a broadcast channel. A [`WalletSubscription`] owns
//! the receiving end plus whatever background sources feed it, and tearing
//! it down (explicitly or by drop) stops those sources.

use alloy::primitives::Address;
use notify::RecommendedWatcher;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::observability::metrics;

/// A change in the wallet environment that invalidates the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletEvent {
    /// The RPC now reports a different chain.
    ChainChanged { from: u64, to: u64 },
    /// The signing key now resolves to a different account.
    AccountsChanged {
        from: Option<Address>,
        to: Option<Address>,
    },
}

impl WalletEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            WalletEvent::ChainChanged { .. } => "chain_changed",
            WalletEvent::AccountsChanged { .. } => "accounts_changed",
        }
    }
}

/// Sending side of wallet events.
#[derive(Debug, Clone)]
pub struct WalletEventHub {
    tx: broadcast::Sender<WalletEvent>,
}

impl WalletEventHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Publish an event to every live subscription.
    pub fn emit(&self, event: WalletEvent) {
        metrics::record_wallet_event(event.kind());
        tracing::info!(event = ?event, "Wallet environment changed");
        let _ = self.tx.send(event);
    }

    /// Subscribe without attaching any background source.
    pub fn subscribe(&self) -> WalletSubscription {
        WalletSubscription {
            events: self.tx.subscribe(),
            tasks: Vec::new(),
            file_watcher: None,
        }
    }

    /// Number of live subscriptions.
    #[cfg(test)]
    pub(crate) fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for WalletEventHub {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to wallet events.
pub struct WalletSubscription {
    events: broadcast::Receiver<WalletEvent>,
    tasks: Vec<JoinHandle<()>>,
    file_watcher: Option<RecommendedWatcher>,
}

impl WalletSubscription {
    /// Tie a background task's lifetime to this subscription.
    pub(crate) fn attach_task(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    /// Tie a file watcher's lifetime to this subscription.
    pub(crate) fn attach_watcher(&mut self, watcher: RecommendedWatcher) {
        self.file_watcher = Some(watcher);
    }

    /// Next event. Lagged events are skipped; `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<WalletEvent> {
        loop {
            match self.events.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Wallet event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Stop all sources and release the listener.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for WalletSubscription {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if self.file_watcher.take().is_some() {
            tracing::debug!("Key file watcher stopped");
        }
    }
}
