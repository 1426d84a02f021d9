//! # Herald Channels
//!
//! Where announcements go once rendered.
//!
//! ```text
//! RotationScheduler ── dispatch ──▶ BroadcastDispatcher
//!                                     ├── ConsoleChannel (stdout, ANSI)
//!                                     └── WebhookChannel (HTTP POST, JSON)
//! ```

pub mod broadcast;
pub mod console;
pub mod webhook;

pub use broadcast::BroadcastDispatcher;
pub use console::ConsoleChannel;
pub use webhook::WebhookChannel;
