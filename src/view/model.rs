//! View model: the page state and its update rules.
//!
//! `ViewModel::update` is the only writer. It takes an [`Action`], mutates
//! the state and returns the [`Effect`]s the runtime must perform. It never
//! performs I/O, so every rule below is testable without a network.
//!
//! # Rules
//! - Mount connects once, then fetches the staker record
//! - Stake/Unstake/Claim are ignored while a submission is in flight
//! - No submission without a session or with an invalid/zero amount
//! - A settled submission clears the busy flag; success re-fetches, and
//!   stake/unstake also clear the pending amount
//! - A wallet event discards the session and reconnects exactly once
//! - Completions carry the epoch they were issued in; stale ones are dropped

use alloy::primitives::Address;
use uuid::Uuid;

use crate::blockchain::{BlockchainError, TxOutcome};
use crate::session::{SessionInfo, WalletEvent};
use crate::staking::{parse_nonzero_amount, StakerRecord, TxKind, TxRequest};

/// User intent or the completion of an effect.
#[derive(Debug, Clone)]
pub enum Action {
    Mount,
    AmountChanged(String),
    Stake,
    Unstake,
    Claim,
    Refresh,
    Connected {
        epoch: u64,
        result: Result<SessionInfo, BlockchainError>,
    },
    Refreshed {
        epoch: u64,
        result: Result<StakerRecord, BlockchainError>,
    },
    Settled {
        epoch: u64,
        kind: TxKind,
        result: Result<TxOutcome, BlockchainError>,
    },
    Wallet(WalletEvent),
}

/// Remote work requested by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Connect {
        epoch: u64,
    },
    FetchRecord {
        epoch: u64,
        staker: Address,
    },
    Submit {
        epoch: u64,
        action_id: Uuid,
        request: TxRequest,
    },
}

/// Category of a user-facing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    WalletUnavailable,
    Connection,
    InvalidAmount,
    ReadFailed,
    TransactionFailed,
}

/// A typed error shown to the user until the next successful step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    epoch: u64,
    connecting: bool,
    session: Option<SessionInfo>,
    record: Option<StakerRecord>,
    amount: String,
    busy: Option<TxKind>,
    banner: Option<Banner>,
    last_tx: Option<TxOutcome>,
    reloads: u64,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Mount => self.mount(),
            Action::AmountChanged(amount) => {
                self.amount = amount;
                Vec::new()
            }
            Action::Stake => self.begin(TxKind::Stake),
            Action::Unstake => self.begin(TxKind::Unstake),
            Action::Claim => self.begin(TxKind::Claim),
            Action::Refresh => self.fetch().into_iter().collect(),
            Action::Connected { epoch, result } => {
                if self.is_stale(epoch, "connect") {
                    return Vec::new();
                }
                self.connecting = false;
                match result {
                    Ok(info) => {
                        self.session = Some(info);
                        self.banner = None;
                        self.fetch().into_iter().collect()
                    }
                    Err(e) => {
                        let kind = match e {
                            BlockchainError::WalletUnavailable(_) => BannerKind::WalletUnavailable,
                            _ => BannerKind::Connection,
                        };
                        tracing::error!(error = %e, "Wallet connection failed");
                        self.banner = Some(Banner::new(kind, e.to_string()));
                        Vec::new()
                    }
                }
            }
            Action::Refreshed { epoch, result } => {
                if self.is_stale(epoch, "refresh") {
                    return Vec::new();
                }
                match result {
                    Ok(record) => self.record = Some(record),
                    Err(e) => {
                        tracing::error!(error = %e, "Fetching staker record failed");
                        self.banner = Some(Banner::new(BannerKind::ReadFailed, e.to_string()));
                    }
                }
                Vec::new()
            }
            Action::Settled { epoch, kind, result } => {
                if self.is_stale(epoch, kind.as_str()) {
                    return Vec::new();
                }
                self.busy = None;
                match result {
                    Ok(outcome) => {
                        self.last_tx = Some(outcome);
                        if kind != TxKind::Claim {
                            self.amount.clear();
                        }
                        self.banner = None;
                        self.fetch().into_iter().collect()
                    }
                    Err(e) => {
                        tracing::error!(kind = %kind, error = %e, "Transaction failed");
                        self.banner = Some(Banner::new(
                            BannerKind::TransactionFailed,
                            format!("{} failed: {}", kind, e),
                        ));
                        Vec::new()
                    }
                }
            }
            Action::Wallet(event) => self.reload(event),
        }
    }

    fn mount(&mut self) -> Vec<Effect> {
        if self.session.is_some() {
            return self.fetch().into_iter().collect();
        }
        if self.connecting {
            return Vec::new();
        }
        self.connecting = true;
        vec![Effect::Connect { epoch: self.epoch }]
    }

    fn fetch(&self) -> Option<Effect> {
        self.session.map(|info| Effect::FetchRecord {
            epoch: self.epoch,
            staker: info.address,
        })
    }

    fn begin(&mut self, kind: TxKind) -> Vec<Effect> {
        if let Some(current) = self.busy {
            tracing::warn!(requested = %kind, in_flight = %current, "Action ignored while busy");
            return Vec::new();
        }
        if self.session.is_none() {
            self.banner = Some(Banner::new(
                BannerKind::WalletUnavailable,
                "Connect a wallet before submitting transactions",
            ));
            return Vec::new();
        }

        let request = match kind {
            TxKind::Claim => TxRequest::Claim,
            TxKind::Stake | TxKind::Unstake => match parse_nonzero_amount(&self.amount) {
                Ok(value) if kind == TxKind::Stake => TxRequest::Stake(value),
                Ok(value) => TxRequest::Unstake(value),
                Err(e) => {
                    self.banner = Some(Banner::new(BannerKind::InvalidAmount, e.to_string()));
                    return Vec::new();
                }
            },
        };

        self.busy = Some(kind);
        self.banner = None;
        vec![Effect::Submit {
            epoch: self.epoch,
            action_id: Uuid::new_v4(),
            request,
        }]
    }

    fn reload(&mut self, event: WalletEvent) -> Vec<Effect> {
        self.epoch += 1;
        self.reloads += 1;
        self.session = None;
        self.record = None;
        self.busy = None;
        self.banner = None;
        self.last_tx = None;
        self.connecting = true;
        tracing::info!(event = ?event, epoch = self.epoch, "Session discarded, reconnecting");
        vec![Effect::Connect { epoch: self.epoch }]
    }

    fn is_stale(&self, epoch: u64, what: &str) -> bool {
        if epoch != self.epoch {
            tracing::debug!(what, epoch, current = self.epoch, "Dropping stale completion");
            return true;
        }
        false
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn session(&self) -> Option<SessionInfo> {
        self.session
    }

    pub fn record(&self) -> Option<&StakerRecord> {
        self.record.as_ref()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn busy(&self) -> Option<TxKind> {
        self.busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// Whether stake/unstake/claim can be triggered right now.
    pub fn actions_enabled(&self) -> bool {
        self.busy.is_none() && self.session.is_some()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn last_tx(&self) -> Option<&TxOutcome> {
        self.last_tx.as_ref()
    }

    /// Reloads triggered by wallet events so far.
    pub fn reloads(&self) -> u64 {
        self.reloads
    }

    pub fn is_loading(&self) -> bool {
        self.record.is_none()
    }
}
