//! Staking contract client library.
//!
//! Connects a wallet, reads and mutates a deployed staking contract, keeps
//! the resulting page state in an explicit view model, and deploys the
//! contract.

pub mod blockchain;
pub mod config;
pub mod deploy;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod session;
pub mod staking;
pub mod view;

pub use config::schema::StakingConfig;
pub use session::{Connector, RpcConnector, Session};
pub use staking::{StakerRecord, StakingClient, StakingContract};
pub use view::{Action, Runtime, ViewModel};
