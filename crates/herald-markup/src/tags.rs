//! Tokenizer for canonical markup, used by channels that render styles
//! themselves.

use crate::palette::{self, Rgb};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Color(Rgb),
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Obfuscated,
    Reset,
    /// `</...>`: ends the styles opened before it.
    Close,
    /// Well-formed but unrecognized (`<offset:N>`, `<color:mauve>`, ...).
    Unknown(String),
}

impl Tag {
    fn parse(inner: &str) -> Self {
        let lower = inner.trim().to_ascii_lowercase();
        if lower.starts_with('/') {
            return Tag::Close;
        }
        if let Some(color) = lower.strip_prefix("color:") {
            return palette::parse_color_arg(color)
                .map(Tag::Color)
                .unwrap_or_else(|| Tag::Unknown(inner.to_string()));
        }
        match lower.as_str() {
            "b" | "bold" => Tag::Bold,
            "i" | "italic" => Tag::Italic,
            "u" | "underline" => Tag::Underline,
            "strikethrough" => Tag::Strikethrough,
            "obfuscated" => Tag::Obfuscated,
            "reset" => Tag::Reset,
            _ => Tag::Unknown(inner.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Tag(Tag),
}

/// Split canonical markup into text and tags. An unclosed `<` is text.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open + 1..].find('>').map(|c| open + 1 + c) else {
            break;
        };
        if open > 0 {
            out.push(Segment::Text(&rest[..open]));
        }
        out.push(Segment::Tag(Tag::parse(&rest[open + 1..close])));
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}
