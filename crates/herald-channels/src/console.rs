//! Console channel: prints announcements to stdout.
//!
//! Canonical tags become ANSI escapes (24-bit color for palette names and
//! hex alike), or are dropped when ANSI output is off.

use std::io::Write;

use async_trait::async_trait;
use herald_core::config::ConsoleConfig;
use herald_core::error::Result;
use herald_core::traits::Channel;
use herald_core::types::Announcement;
use herald_markup::tags::{Segment, Tag, segments};

const RESET: &str = "\x1b[0m";

pub struct ConsoleChannel {
    ansi: bool,
}

impl ConsoleChannel {
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(config.ansi)
    }

    /// Lines this channel would print for `announcement`.
    pub fn format(&self, announcement: &Announcement) -> Vec<String> {
        let mut lines: Vec<String> = announcement
            .chat_lines
            .iter()
            .map(|line| self.markup(line))
            .collect();

        if let Some(n) = &announcement.notification {
            let mut line = format!("[notification] {}", self.markup(&n.title));
            if !n.subtitle.is_empty() {
                line.push_str(" - ");
                line.push_str(&self.markup(&n.subtitle));
            }
            if let Some(icon) = &n.icon {
                line.push_str(&format!(" (icon: {icon})"));
            }
            lines.push(line);
        }

        if let Some(t) = &announcement.title {
            let kind = if t.is_major { "title, major" } else { "title" };
            let mut line = format!("[{kind}] {}", t.title);
            if !t.subtitle.is_empty() {
                line.push_str(" / ");
                line.push_str(&t.subtitle);
            }
            line.push_str(&format!(
                " (fade in {}s, stay {}s, fade out {}s)",
                t.fade_in, t.stay, t.fade_out
            ));
            lines.push(line);
        }

        if let Some(s) = &announcement.sound {
            lines.push(format!(
                "[sound] {} (volume {}, pitch {})",
                s.name, s.volume, s.pitch
            ));
        }

        lines
    }

    fn markup(&self, text: &str) -> String {
        if self.ansi { to_ansi(text) } else { to_plain(text) }
    }
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, announcement: &Announcement) -> Result<()> {
        let lines = self.format(announcement);
        let mut out = std::io::stdout().lock();
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Convert canonical markup to ANSI-styled text.
pub fn to_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut styled = false;
    for segment in segments(text) {
        match segment {
            Segment::Text(t) => out.push_str(t),
            Segment::Tag(tag) => {
                let Some(code) = ansi_code(&tag) else {
                    continue;
                };
                styled = code != RESET;
                out.push_str(&code);
            }
        }
    }
    if styled {
        out.push_str(RESET);
    }
    out
}

/// Drop every tag, keeping the text.
pub fn to_plain(text: &str) -> String {
    segments(text)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Text(t) => Some(t),
            Segment::Tag(_) => None,
        })
        .collect()
}

fn ansi_code(tag: &Tag) -> Option<String> {
    let code = match tag {
        Tag::Color(rgb) => format!("\x1b[38;2;{};{};{}m", rgb.r, rgb.g, rgb.b),
        Tag::Bold => "\x1b[1m".into(),
        Tag::Italic => "\x1b[3m".into(),
        Tag::Underline => "\x1b[4m".into(),
        Tag::Strikethrough => "\x1b[9m".into(),
        Tag::Reset | Tag::Close => RESET.into(),
        Tag::Obfuscated | Tag::Unknown(_) => return None,
    };
    Some(code)
}
