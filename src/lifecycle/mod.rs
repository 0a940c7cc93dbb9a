//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl-C (signals in shutdown.rs)
//!     → Shutdown::trigger
//!     → interactive session loop stops reading input
//!     → wallet subscription torn down, process exits
//! ```

pub mod shutdown;

pub use shutdown::{listen_for_ctrl_c, Shutdown};
