//! # Herald Scheduler
//!
//! Keeps the rotation set and fires one announcement per interval.
//!
//! ## Architecture
//! ```text
//! MessageLoader (messages/**/*.json)
//!   └── load_all() → MessageStore (enabled only, priority desc)
//!                       └── RotationScheduler (tokio interval)
//!                             ├── sequential: cursor mod len
//!                             ├── random: uniform pick
//!                             └── on tick → render → Dispatcher
//! ```

pub mod engine;
pub mod loader;
pub mod store;

pub use engine::{DEFAULT_STOP_GRACE, RotationScheduler, TickOutcome};
pub use loader::MessageLoader;
pub use store::{MessageStore, Snapshot};
