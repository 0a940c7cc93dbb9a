//! Staking contract access.
//!
//! # Data Flow
//! ```text
//! user input "1.5"
//!     → units.rs (parse into 18-decimal fixed point)
//!     → client.rs (sign, submit, wait for confirmation)
//!     → contract `stakers(address)` read
//!     → types.rs StakerRecord
//!     → units.rs (format back to "1.5")
//! ```
//!
//! The contract owns all staking invariants; nothing here is cached or
//! persisted.

pub mod client;
pub mod contract;
pub mod types;
pub mod units;

pub use client::StakingClient;
pub use contract::{submit, StakingContract};
pub use types::{StakerRecord, TxKind, TxRequest};
pub use units::{format_amount, parse_amount, parse_nonzero_amount, AmountError};
