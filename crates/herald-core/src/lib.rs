//! # Herald Core
//! Shared types, traits, configuration and errors for the Herald
//! announcement broadcaster.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{HeraldConfig, RotationConfig};
pub use error::{HeraldError, Result};
