//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Read from the contract or RPC:
//!     → timeouts enforced by the blockchain client
//!     → On transient failure: retries.rs (retry with backoff.rs delays)
//! ```
//!
//! # Design Decisions
//! - Only reads are retried; a resubmitted transaction could double-spend
//! - Only transient errors (RPC failure, timeout) are retried
//! - Jittered backoff prevents synchronized retries against one endpoint

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::retry_read;
