//! Visible width measurement and markup stripping.
//!
//! Both operations share one left-to-right scanner so they always agree on
//! what counts as markup:
//! - `<...>` spans (canonical tags and directives) are skipped. A `<` with no
//!   closing `>` is plain text.
//! - `&#RRGGBB` (8 chars) and `&x&R&R&G&G&B&B` (14 chars) are skipped.
//! - `&` + one of the 22 legacy codes (2 chars) is skipped.
//! - Every other character is one column wide.

use crate::palette;

/// Number of on-screen columns `text` occupies.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    scan_visible(text, |_| width += 1);
    width
}

/// `text` with all canonical tags, legacy codes and legacy hex removed.
pub fn strip_all_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    scan_visible(text, |c| out.push(c));
    out
}

fn scan_visible(text: &str, mut visible: impl FnMut(char)) {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let skip = match c {
            '<' => chars[i + 1..].iter().position(|&ch| ch == '>').map(|end| end + 2),
            '&' => legacy_span(&chars[i..]),
            _ => None,
        };
        match skip {
            Some(len) => i += len,
            None => {
                visible(c);
                i += 1;
            }
        }
    }
}

/// Length of the legacy code starting at `chars[0]` (an `&`), if any.
fn legacy_span(chars: &[char]) -> Option<usize> {
    let next = *chars.get(1)?;
    if palette::is_legacy_code(next) {
        return Some(2);
    }
    match next {
        '#' if chars.len() >= 8 && chars[2..8].iter().all(char::is_ascii_hexdigit) => Some(8),
        'x' | 'X' if chars.len() >= 14 && is_escaped_hex(&chars[2..14]) => Some(14),
        _ => None,
    }
}

fn is_escaped_hex(chars: &[char]) -> bool {
    chars
        .chunks(2)
        .all(|pair| pair[0] == '&' && pair[1].is_ascii_hexdigit())
}
