//! Effect execution for the view model.
//!
//! The runtime owns the [`ViewModel`] and is driven from a single task.
//! Effects run on spawned tokio tasks and report back through a channel,
//! so a slow confirmation never blocks input handling.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::blockchain::{BlockchainError, BlockchainResult};
use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::retry_read;
use crate::session::{Connector, Session, SessionSlot};
use crate::staking::{submit, StakingContract as _};
use crate::view::model::{Action, Effect, ViewModel};

enum Completion<C> {
    Action(Action),
    Session {
        epoch: u64,
        result: BlockchainResult<Session<C>>,
    },
}

pub struct Runtime<K: Connector> {
    connector: Arc<K>,
    slot: Arc<SessionSlot<K::Contract>>,
    model: ViewModel,
    retry: RetryConfig,
    tx: mpsc::UnboundedSender<Completion<K::Contract>>,
    rx: mpsc::UnboundedReceiver<Completion<K::Contract>>,
    in_flight: usize,
}

impl<K: Connector> Runtime<K> {
    pub fn new(connector: K, retry: RetryConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            connector: Arc::new(connector),
            slot: Arc::new(SessionSlot::new()),
            model: ViewModel::new(),
            retry,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    /// Current session, if connected.
    pub fn session(&self) -> Option<Arc<Session<K::Contract>>> {
        self.slot.load()
    }

    /// Apply an action and start the effects it asks for.
    pub fn dispatch(&mut self, action: Action) {
        if matches!(action, Action::Wallet(_)) {
            self.slot.clear();
        }
        for effect in self.model.update(action) {
            self.spawn(effect);
        }
    }

    /// Whether no effect is still running.
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Wait for the next effect to finish and return its completion action.
    ///
    /// Pends forever when idle; callers select on it alongside other inputs.
    pub async fn next_action(&mut self) -> Action {
        // The runtime holds a sender, so the channel never closes.
        let Some(completion) = self.rx.recv().await else {
            return std::future::pending().await;
        };
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::Action(action) => action,
            Completion::Session { epoch, result } => {
                let result = result.map(|session| {
                    let info = session.info();
                    if epoch == self.model.epoch() {
                        self.slot.store(session);
                    }
                    info
                });
                Action::Connected { epoch, result }
            }
        }
    }

    /// Process completions until nothing is in flight.
    pub async fn drive_until_idle(&mut self) {
        while !self.is_idle() {
            let action = self.next_action().await;
            self.dispatch(action);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        self.in_flight += 1;
        let tx = self.tx.clone();
        let slot = self.slot.clone();

        match effect {
            Effect::Connect { epoch } => {
                let connector = self.connector.clone();
                tokio::spawn(async move {
                    let result = connector.connect().await;
                    let _ = tx.send(Completion::Session { epoch, result });
                });
            }
            Effect::FetchRecord { epoch, staker } => {
                let retry = self.retry.clone();
                tokio::spawn(async move {
                    let result = match slot.load() {
                        Some(session) => {
                            let contract = &session.contract;
                            retry_read(&retry, "stakers", || contract.stakers(staker)).await
                        }
                        None => Err(not_connected()),
                    };
                    let _ = tx.send(Completion::Action(Action::Refreshed { epoch, result }));
                });
            }
            Effect::Submit {
                epoch,
                action_id,
                request,
            } => {
                let kind = request.kind();
                let span = tracing::info_span!("action", %action_id, kind = %kind, epoch);
                tokio::spawn(
                    async move {
                        tracing::info!(request = ?request, "Submitting transaction");
                        let result = match slot.load() {
                            Some(session) => submit(&session.contract, request).await,
                            None => Err(not_connected()),
                        };
                        metrics::record_action(kind.as_str(), result.is_ok());
                        let _ = tx.send(Completion::Action(Action::Settled { epoch, kind, result }));
                    }
                    .instrument(span),
                );
            }
        }
    }
}

fn not_connected() -> BlockchainError {
    BlockchainError::WalletUnavailable("Session was discarded".to_string())
}
