//! Sources of wallet change events.
//!
//! - `chainChanged`: poll the RPC chain ID and compare with the last value
//! - `accountsChanged`: watch the key file and re-derive the address

use alloy::primitives::Address;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::blockchain::{BlockchainClient, KeySource, Wallet};
use crate::session::events::{WalletEvent, WalletEventHub, WalletSubscription};

/// Starts the background sources that feed a [`WalletEventHub`].
pub struct WalletWatcher {
    hub: WalletEventHub,
    client: BlockchainClient,
    poll_interval: Duration,
    key_source: KeySource,
}

impl WalletWatcher {
    /// `client` only needs read access; it is used for chain ID polls.
    pub fn new(
        hub: WalletEventHub,
        client: BlockchainClient,
        poll_interval: Duration,
        key_source: KeySource,
    ) -> Self {
        Self {
            hub,
            client,
            poll_interval,
            key_source,
        }
    }

    /// Subscribe and start the sources; they stop when the subscription does.
    pub fn start(
        &self,
        initial_chain: Option<u64>,
        initial_account: Option<Address>,
    ) -> Result<WalletSubscription, notify::Error> {
        let mut subscription = self.hub.subscribe();

        subscription.attach_task(tokio::spawn(poll_chain(
            self.hub.clone(),
            self.client.clone(),
            self.poll_interval,
            initial_chain,
        )));

        if let KeySource::File(path) = &self.key_source {
            let watcher = watch_key_file(self.hub.clone(), path, initial_account)?;
            subscription.attach_watcher(watcher);
        }

        tracing::info!(
            poll_secs = self.poll_interval.as_secs(),
            key_source = %self.key_source,
            "Wallet watcher started"
        );
        Ok(subscription)
    }
}

/// Record the latest chain ID and report whether it moved.
pub fn chain_transition(last: &mut Option<u64>, current: u64) -> Option<WalletEvent> {
    let previous = last.replace(current);
    match previous {
        Some(from) if from != current => Some(WalletEvent::ChainChanged { from, to: current }),
        _ => None,
    }
}

/// Record the latest account and report whether it moved.
pub fn account_transition(last: &mut Option<Address>, current: Option<Address>) -> Option<WalletEvent> {
    let previous = std::mem::replace(last, current);
    if previous != current {
        Some(WalletEvent::AccountsChanged {
            from: previous,
            to: current,
        })
    } else {
        None
    }
}

async fn poll_chain(
    hub: WalletEventHub,
    client: BlockchainClient,
    poll_interval: Duration,
    mut last: Option<u64>,
) {
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match client.get_chain_id().await {
            Ok(chain_id) => {
                if let Some(event) = chain_transition(&mut last, chain_id.0) {
                    hub.emit(event);
                }
            }
            Err(e) => tracing::debug!(error = %e, "Chain ID poll failed"),
        }
    }
}

fn watch_key_file(
    hub: WalletEventHub,
    path: &Path,
    initial_account: Option<Address>,
) -> Result<RecommendedWatcher, notify::Error> {
    let key_path: PathBuf = path.to_path_buf();
    let last = Arc::new(Mutex::new(initial_account));

    // Watch the parent directory: editors and secret managers replace files.
    let dir = key_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = key_path.file_name().map(|n| n.to_os_string());

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let touches_key = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if !touches_key {
                    return;
                }
                let current = match Wallet::from_key_file(&key_path) {
                    Ok(wallet) => Some(wallet.address()),
                    Err(e) => {
                        tracing::warn!(error = %e, "Key file unreadable after change");
                        None
                    }
                };
                let Ok(mut guard) = last.lock() else {
                    return;
                };
                if let Some(event) = account_transition(&mut guard, current) {
                    hub.emit(event);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::info!(path = ?path, "Key file watcher started");
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_transition() {
        let mut last = None;
        assert_eq!(chain_transition(&mut last, 1), None);
        assert_eq!(chain_transition(&mut last, 1), None);
        assert_eq!(
            chain_transition(&mut last, 11155111),
            Some(WalletEvent::ChainChanged { from: 1, to: 11155111 })
        );
        assert_eq!(last, Some(11155111));
    }

    #[test]
    fn test_account_transition() {
        let a = Address::repeat_byte(0xaa);
        let b = Address::repeat_byte(0xbb);
        let mut last = Some(a);

        assert_eq!(account_transition(&mut last, Some(a)), None);
        assert_eq!(
            account_transition(&mut last, Some(b)),
            Some(WalletEvent::AccountsChanged {
                from: Some(a),
                to: Some(b)
            })
        );
        assert_eq!(
            account_transition(&mut last, None),
            Some(WalletEvent::AccountsChanged {
                from: Some(b),
                to: None
            })
        );
    }
}
