//! Seams between the rotation core and its collaborators.

pub mod channel;

pub use channel::{Channel, Dispatcher};
