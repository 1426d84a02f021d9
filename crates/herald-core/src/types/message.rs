//! Announcement messages as authored in message files.
//!
//! Files use PascalCase keys:
//! ```json
//! {
//!   "ChatMessages": ["&6Welcome!", "<offset:-2>&7Visit our site"],
//!   "Center": true,
//!   "Notification": { "Title": "Hello", "Subtitle": "world", "Icon": "Sword" },
//!   "Title": { "Title": "Event", "Subtitle": "Starts soon", "IsMajor": true },
//!   "Sound": { "SoundName": "ui_ding", "Volume": 0.8 },
//!   "Priority": 10,
//!   "Enabled": true
//! }
//! ```
//! `null` anywhere falls back to the field default.

use serde::{Deserialize, Serialize};

use crate::error::{HeraldError, Result};

/// A single announcement. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Path of the message file relative to the messages dir, without `.json`.
    pub name: String,
    pub chat_lines: Vec<String>,
    pub center_chat: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<Sound>,
    pub priority: i32,
    pub enabled: bool,
}

/// Toast-style notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Notification {
    pub fn has_icon(&self) -> bool {
        self.icon.as_deref().is_some_and(|i| !i.is_empty())
    }
}

/// Large on-screen title. Timings are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub title: String,
    pub subtitle: String,
    pub is_major: bool,
    pub fade_in: f32,
    pub stay: f32,
    pub fade_out: f32,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            is_major: false,
            fade_in: 0.25,
            stay: 5.0,
            fade_out: 0.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sound {
    pub name: String,
    pub volume: f32,
    pub pitch: f32,
}

impl Sound {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume: 1.0,
            pitch: 1.0,
        }
    }
}

impl Message {
    /// Empty, enabled message with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chat_lines: vec![],
            center_chat: true,
            notification: None,
            title: None,
            sound: None,
            priority: 0,
            enabled: true,
        }
    }

    /// Chat-only message.
    pub fn chat<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chat_lines: lines.into_iter().map(Into::into).collect(),
            ..Self::new(name)
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_center(mut self, center: bool) -> Self {
        self.center_chat = center;
        self
    }

    pub fn has_chat_messages(&self) -> bool {
        !self.chat_lines.is_empty()
    }

    /// True when dispatching this message would have any visible or audible effect.
    pub fn has_payload(&self) -> bool {
        self.has_chat_messages()
            || self.notification.is_some()
            || self.title.is_some()
            || self.sound.as_ref().is_some_and(|s| !s.name.is_empty())
    }

    /// Parse a message file. `name` becomes the message identity.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let name = name.into();
        if json.trim().is_empty() {
            return Err(HeraldError::message_parse(name, "file is empty"));
        }
        let file: MessageFile = serde_json::from_str(json.trim())
            .map_err(|e| HeraldError::message_parse(name.clone(), e))?;
        Ok(file.into_message(name))
    }
}

// ── On-disk representation ─────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MessageFile {
    chat_messages: Option<Vec<Option<String>>>,
    center: Option<bool>,
    notification: Option<NotificationFile>,
    title: Option<TitleFile>,
    sound: Option<SoundFile>,
    priority: Option<i32>,
    enabled: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NotificationFile {
    title: Option<String>,
    subtitle: Option<String>,
    icon: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TitleFile {
    title: Option<String>,
    subtitle: Option<String>,
    is_major: Option<bool>,
    fade_in: Option<f32>,
    stay: Option<f32>,
    fade_out: Option<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SoundFile {
    sound_name: Option<String>,
    volume: Option<f32>,
    pitch: Option<f32>,
}

impl MessageFile {
    fn into_message(self, name: String) -> Message {
        let defaults = Title::default();
        Message {
            name,
            chat_lines: self
                .chat_messages
                .unwrap_or_default()
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
            center_chat: self.center.unwrap_or(true),
            notification: self.notification.map(|n| Notification {
                title: n.title.unwrap_or_default(),
                subtitle: n.subtitle.unwrap_or_default(),
                icon: n.icon,
            }),
            title: self.title.map(|t| Title {
                title: t.title.unwrap_or_default(),
                subtitle: t.subtitle.unwrap_or_default(),
                is_major: t.is_major.unwrap_or(false),
                fade_in: t.fade_in.unwrap_or(defaults.fade_in),
                stay: t.stay.unwrap_or(defaults.stay),
                fade_out: t.fade_out.unwrap_or(defaults.fade_out),
            }),
            sound: self.sound.map(|s| Sound {
                name: s.sound_name.unwrap_or_default(),
                volume: s.volume.unwrap_or(1.0),
                pitch: s.pitch.unwrap_or(1.0),
            }),
            priority: self.priority.unwrap_or(0),
            enabled: self.enabled.unwrap_or(true),
        }
    }
}
