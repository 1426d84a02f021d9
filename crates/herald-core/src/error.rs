//! Unified error types for Herald.

use thiserror::Error;

/// Result type alias using HeraldError.
pub type Result<T> = std::result::Result<T, HeraldError>;

#[derive(Error, Debug)]
pub enum HeraldError {
    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // Message loading errors
    #[error("Message loader error: {0}")]
    Loader(String),

    #[error("Invalid message file {name}: {reason}")]
    MessageParse { name: String, reason: String },

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Message is disabled: {0}")]
    MessageDisabled(String),

    // Delivery errors
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl HeraldError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn loader(msg: impl Into<String>) -> Self {
        Self::Loader(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }

    pub fn message_parse(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MessageParse {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
