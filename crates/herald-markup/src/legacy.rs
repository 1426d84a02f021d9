//! Legacy `&` code translation into canonical tags.
//!
//! | Legacy | Canonical |
//! |--------|-----------|
//! | `&#1A2B3C` | `<color:#1A2B3C>` |
//! | `&x&1&A&2&B&3&C` | `<color:#1A2B3C>` |
//! | `&0`..`&f` | `<color:black>`..`<color:white>` |
//! | `&l` `&o` `&n` `&r` | `<b>` `<i>` `<u>` `<reset>` |
//! | `&k` `&m` | `<obfuscated>` `<strikethrough>` |

use std::sync::LazyLock;

use regex::Regex;

use crate::palette;

static AMP_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([0-9A-Fa-f]{6})").expect("valid regex"));

static AMP_X_HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "&[xX]",
        "&([0-9A-Fa-f])&([0-9A-Fa-f])",
        "&([0-9A-Fa-f])&([0-9A-Fa-f])",
        "&([0-9A-Fa-f])&([0-9A-Fa-f])",
    ))
    .expect("valid regex")
});

/// Rewrite every legacy code in `text` as a canonical tag.
///
/// Hex forms go first so their digits are never read as single-character
/// codes. Anything after `&` that is not a known code is left alone.
pub fn translate_legacy(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let text = AMP_HEX.replace_all(text, "<color:#$1>");
    let text = AMP_X_HEX.replace_all(&text, "<color:#$1$2$3$4$5$6>");
    if !text.contains('&') {
        return text.into_owned();
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let Some(&code) = chars.peek() else {
            out.push(c);
            continue;
        };
        if let Some(name) = palette::color_name_for_code(code) {
            out.push_str("<color:");
            out.push_str(name);
            out.push('>');
            chars.next();
        } else if let Some(tag) = palette::style_tag_for_code(code) {
            out.push('<');
            out.push_str(tag);
            out.push('>');
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_single_char_code() {
        let expected = [
            ('0', "<color:black>"),
            ('1', "<color:dark_blue>"),
            ('2', "<color:dark_green>"),
            ('3', "<color:dark_aqua>"),
            ('4', "<color:dark_red>"),
            ('5', "<color:dark_purple>"),
            ('6', "<color:gold>"),
            ('7', "<color:gray>"),
            ('8', "<color:dark_gray>"),
            ('9', "<color:blue>"),
            ('a', "<color:green>"),
            ('b', "<color:aqua>"),
            ('c', "<color:red>"),
            ('d', "<color:light_purple>"),
            ('e', "<color:yellow>"),
            ('f', "<color:white>"),
            ('k', "<obfuscated>"),
            ('l', "<b>"),
            ('m', "<strikethrough>"),
            ('n', "<u>"),
            ('o', "<i>"),
            ('r', "<reset>"),
        ];
        for (code, tag) in expected {
            let out = translate_legacy(&format!("&{code}"));
            assert_eq!(out, tag, "code {code}");
            assert_eq!(out.matches(tag).count(), 1);
            assert!(!out.contains('&'));

            let upper = translate_legacy(&format!("&{}", code.to_ascii_uppercase()));
            assert_eq!(upper, tag, "uppercase code {code}");
        }
    }

    #[test]
    fn test_hex_forms_agree() {
        assert_eq!(translate_legacy("&#1A2B3C"), "<color:#1A2B3C>");
        assert_eq!(translate_legacy("&x&1&A&2&B&3&C"), "<color:#1A2B3C>");
        assert_eq!(translate_legacy("&X&1&A&2&B&3&C"), "<color:#1A2B3C>");
    }

    #[test]
    fn test_hex_digits_not_read_as_codes() {
        // `&#ABCDEF` must not become `&#` + `<color:aqua>`...
        assert_eq!(translate_legacy("&#abcdef hi"), "<color:#abcdef> hi");
        assert_eq!(translate_legacy("&x&a&b&c&d&e&f!"), "<color:#abcdef>!");
    }

    #[test]
    fn test_malformed_hex_left_alone() {
        assert_eq!(translate_legacy("&#12345 x"), "&#12345 x");
        // five escaped digits: `&x` stays, the digit codes still translate
        assert_eq!(
            translate_legacy("&x&1&2&3&4&5"),
            "&x<color:dark_blue><color:dark_green><color:dark_aqua><color:dark_red><color:dark_purple>"
        );
    }

    #[test]
    fn test_unknown_and_trailing_ampersands() {
        assert_eq!(translate_legacy("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(translate_legacy("&z&"), "&z&");
        assert_eq!(translate_legacy(""), "");
    }

    #[test]
    fn test_mixed_line() {
        assert_eq!(
            translate_legacy("&6&lWelcome &rto &#00FF00the server"),
            "<color:gold><b>Welcome <reset>to <color:#00FF00>the server"
        );
    }

    #[test]
    fn test_canonical_tags_untouched() {
        let text = "<color:red>already <b>canonical</b>";
        assert_eq!(translate_legacy(text), text);
    }
}
