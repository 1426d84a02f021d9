//! Rendered announcements handed to dispatchers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::message::{Message, Sound};

/// A message after markup translation and centering, ready for delivery.
#[derive(Debug, Clone)]
pub struct Announcement {
    pub message: Arc<Message>,
    /// Display strings in send order: directives stripped, legacy codes
    /// translated, centered when the message asks for it.
    pub chat_lines: Vec<String>,
    pub notification: Option<RenderedNotification>,
    pub title: Option<RenderedTitle>,
    pub sound: Option<Sound>,
    pub fired_at: DateTime<Utc>,
}

impl Announcement {
    pub fn name(&self) -> &str {
        &self.message.name
    }

    /// True when there is nothing to deliver.
    pub fn is_empty(&self) -> bool {
        self.chat_lines.is_empty()
            && self.notification.is_none()
            && self.title.is_none()
            && self.sound.is_none()
    }
}

/// Notification with canonical markup.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedNotification {
    pub title: String,
    pub subtitle: String,
    pub icon: Option<String>,
}

/// Title reduced to plain text.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedTitle {
    pub title: String,
    pub subtitle: String,
    pub is_major: bool,
    pub fade_in: f32,
    pub stay: f32,
    pub fade_out: f32,
}

/// Outcome of fanning one announcement out to recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: Vec<String>,
}

impl DispatchReport {
    pub fn record_success(&mut self) {
        self.delivered += 1;
    }

    pub fn record_failure(&mut self, recipient: impl Into<String>) {
        self.failed.push(recipient.into());
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl std::fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.failed.is_empty() {
            write!(f, "{} delivered", self.delivered)
        } else {
            write!(
                f,
                "{} delivered, {} failed ({})",
                self.delivered,
                self.failed.len(),
                self.failed.join(", ")
            )
        }
    }
}
