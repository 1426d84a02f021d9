//! Message → [`Announcement`] rendering.
//!
//! Chat line pipeline: placeholders → offset extraction → directive
//! stripping → legacy translation → centering.

use std::collections::BTreeMap;
use std::sync::Arc;

use herald_core::config::HeraldConfig;
use herald_core::types::{Announcement, Message, RenderedNotification, RenderedTitle};

use crate::center::center;
use crate::directive::{extract_offset, strip_offset_directives};
use crate::legacy::translate_legacy;
use crate::placeholder::replace_placeholders;
use crate::width::strip_all_markup;

/// Display settings applied while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub center_width: usize,
    pub placeholders: BTreeMap<String, String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            center_width: 80,
            placeholders: BTreeMap::new(),
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &HeraldConfig) -> Self {
        Self {
            center_width: config.display.center_width,
            placeholders: config.placeholders.clone(),
        }
    }

    pub fn with_center_width(mut self, width: usize) -> Self {
        self.center_width = width;
        self
    }
}

/// Render a single chat line.
pub fn render_chat_line(line: &str, centered: bool, center_width: usize) -> String {
    let offset = extract_offset(line);
    let line = translate_legacy(&strip_offset_directives(line));
    if centered {
        center(&line, center_width, offset)
    } else {
        line
    }
}

/// Render every part of `message`. Empty chat lines are dropped.
pub fn render(message: Arc<Message>, options: &RenderOptions) -> Announcement {
    let mut values = options.placeholders.clone();
    values
        .entry("message".to_string())
        .or_insert_with(|| message.name.clone());
    let fill = |text: &str| replace_placeholders(text, &values);

    let chat_lines = message
        .chat_lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| render_chat_line(&fill(line), message.center_chat, options.center_width))
        .collect();

    let notification = message.notification.as_ref().map(|n| RenderedNotification {
        title: translate_legacy(&fill(&n.title)),
        subtitle: translate_legacy(&fill(&n.subtitle)),
        icon: n.has_icon().then(|| n.icon.clone()).flatten(),
    });

    let plain = |text: &str| strip_all_markup(&translate_legacy(&fill(text)));
    let title = message.title.as_ref().map(|t| RenderedTitle {
        title: plain(&t.title),
        subtitle: plain(&t.subtitle),
        is_major: t.is_major,
        fade_in: t.fade_in,
        stay: t.stay,
        fade_out: t.fade_out,
    });

    let sound = message.sound.clone().filter(|s| !s.name.is_empty());

    Announcement {
        message,
        chat_lines,
        notification,
        title,
        sound,
        fired_at: chrono::Utc::now(),
    }
}
