//! Wallet changes keep reloading the session after a failed reconnect.

use alloy::primitives::Address;
use std::sync::atomic::Ordering;
use std::time::Duration;

use staking_client::blockchain::{BlockchainClient, KeySource};
use staking_client::config::{NetworkConfig, RetryConfig};
use staking_client::session::{WalletEvent, WalletEventHub, WalletListener, WalletWatcher};
use staking_client::view::{Action, BannerKind, Runtime};

mod common;
use common::{MockChain, MockConnector};

fn listener(hub: &WalletEventHub) -> WalletListener {
    let network = NetworkConfig {
        rpc_url: "http://127.0.0.1:9".to_string(),
        ..NetworkConfig::default()
    };
    WalletListener::new(WalletWatcher::new(
        hub.clone(),
        BlockchainClient::new(&network, None).unwrap(),
        Duration::from_secs(3600),
        KeySource::Env("STAKING_RELOAD_TEST_UNSET_KEY".to_string()),
    ))
}

#[tokio::test]
async fn test_second_change_after_failed_reconnect_reloads() {
    let alice = Address::repeat_byte(0xa1);
    let bob = Address::repeat_byte(0xb0);
    let chain = MockChain::with_wallet(alice);
    let hub = WalletEventHub::new();
    let mut listener = listener(&hub);
    listener.restart().unwrap();

    let mut runtime = Runtime::new(MockConnector { chain: chain.clone() }, RetryConfig::default());
    runtime.dispatch(Action::Mount);
    runtime.drive_until_idle().await;
    listener.observe(runtime.model().session().unwrap());
    assert_eq!(chain.connects.load(Ordering::SeqCst), 1);

    // The key goes away: the reload fails.
    chain.set_wallet(None);
    hub.emit(WalletEvent::AccountsChanged {
        from: Some(alice),
        to: None,
    });
    let event = listener.next_event().await.unwrap();
    runtime.dispatch(Action::Wallet(event));
    runtime.drive_until_idle().await;
    assert_eq!(chain.connects.load(Ordering::SeqCst), 2);
    assert!(runtime.model().session().is_none());
    assert_eq!(runtime.model().banner().unwrap().kind, BannerKind::WalletUnavailable);

    // A new key is still noticed and reconnects.
    chain.set_wallet(Some(bob));
    hub.emit(WalletEvent::AccountsChanged {
        from: None,
        to: Some(bob),
    });
    let event = tokio::time::timeout(Duration::from_secs(1), listener.next_event())
        .await
        .expect("listener stopped after the failed reconnect")
        .unwrap();
    runtime.dispatch(Action::Wallet(event));
    runtime.drive_until_idle().await;

    assert_eq!(chain.connects.load(Ordering::SeqCst), 3);
    assert_eq!(runtime.model().session().unwrap().address, bob);
    assert!(runtime.model().banner().is_none());
    assert_eq!(listener.seeds(), (Some(31337), Some(bob)));
}
