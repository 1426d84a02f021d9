//! Herald configuration (`~/.herald/config.toml`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HeraldError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeraldConfig {
    /// Directory scanned recursively for `*.json` message files.
    #[serde(default = "default_messages_dir")]
    pub messages_dir: String,
    /// Write the bundled example messages on startup when missing.
    #[serde(default = "default_true")]
    pub create_example_messages: bool,
    /// `info`, `debug` or `none`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    /// `{key}` substitutions applied to every rendered line.
    #[serde(default)]
    pub placeholders: BTreeMap<String, String>,
}

/// Rotation timing and policy. Only applied on scheduler (re)start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotationConfig {
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    #[serde(rename = "enable_randomization", default)]
    pub randomized: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            randomized: false,
        }
    }
}

impl RotationConfig {
    pub fn policy_name(&self) -> &'static str {
        if self.randomized { "random" } else { "sequential" }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Fixed display width used for centering chat lines.
    #[serde(default = "default_center_width")]
    pub center_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { center_width: default_center_width() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// How long `stop` waits for an in-flight tick before aborting it.
    #[serde(default = "default_grace")]
    pub stop_grace_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { stop_grace_seconds: default_grace() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Render canonical tags as ANSI escapes instead of stripping them.
    #[serde(default = "default_true")]
    pub ansi: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true, ansi: true }
    }
}

/// Outbound webhook receiving every announcement as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_webhook_timeout")]
    pub timeout_seconds: u64,
}

fn default_true() -> bool { true }
fn default_messages_dir() -> String { "~/.herald/messages".into() }
fn default_log_level() -> String { "info".into() }
fn default_version() -> u32 { 1 }
fn default_interval() -> u64 { 300 }
fn default_center_width() -> usize { 80 }
fn default_grace() -> u64 { 5 }
fn default_webhook_timeout() -> u64 { 10 }

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            messages_dir: default_messages_dir(),
            create_example_messages: true,
            log_level: default_log_level(),
            version: default_version(),
            rotation: RotationConfig::default(),
            display: DisplayConfig::default(),
            scheduler: SchedulerConfig::default(),
            channels: ChannelsConfig::default(),
            placeholders: BTreeMap::new(),
        }
    }
}

impl HeraldConfig {
    /// Herald home directory (`~/.herald`).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".herald")
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Load from the default path, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HeraldError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| HeraldError::config(format!("Serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.rotation.interval_seconds == 0 {
            return Err(HeraldError::config("rotation.interval_seconds must be greater than 0"));
        }
        if self.display.center_width == 0 {
            return Err(HeraldError::config("display.center_width must be greater than 0"));
        }
        if let Some(webhook) = &self.channels.webhook
            && webhook.enabled
            && webhook.url.trim().is_empty()
        {
            return Err(HeraldError::config("channels.webhook.url is empty"));
        }
        Ok(())
    }

    /// Messages directory with `~` expanded.
    pub fn messages_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.messages_dir).to_string())
    }

    /// `tracing` filter directive for the configured log level.
    pub fn log_filter(&self) -> &'static str {
        match self.log_level.to_ascii_lowercase().as_str() {
            "none" | "off" => "off",
            "debug" => "herald=debug,herald_core=debug,herald_markup=debug,herald_scheduler=debug,herald_channels=debug",
            _ => "herald=info,herald_core=info,herald_markup=info,herald_scheduler=info,herald_channels=info",
        }
    }
}
