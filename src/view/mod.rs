//! View layer: the staking page as an explicit state machine.
//!
//! # Data Flow
//! ```text
//! user input / wallet event
//!     → Action
//!     → model.rs ViewModel::update (pure) → Vec<Effect>
//!     → runtime.rs executes effects on tokio tasks
//!     → completion Action → ViewModel::update
//!     → render.rs prints the page
//! ```

pub mod model;
pub mod render;
pub mod runtime;

pub use model::{Action, Banner, BannerKind, Effect, ViewModel};
pub use render::render;
pub use runtime::Runtime;
