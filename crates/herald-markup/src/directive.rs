//! `<offset:N>` centering directives.
//!
//! A positive offset shifts a centered line right, a negative one shifts it
//! left. Only the first directive on a line counts; all of them are removed
//! before the line is measured or sent.

use std::sync::LazyLock;

use regex::Regex;

static OFFSET_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<offset:(-?\d+)>").expect("valid regex"));

/// Value of the first offset directive, or 0 when absent or out of `i32`
/// range. `N` is an optional `-` followed by ASCII digits; anything else is
/// not a directive.
pub fn extract_offset(text: &str) -> i32 {
    let Some(value) = OFFSET_DIRECTIVE.captures(text).and_then(|caps| caps.get(1)) else {
        return 0;
    };
    match value.as_str().parse() {
        Ok(offset) => offset,
        Err(_) => {
            tracing::debug!("Ignoring out-of-range offset {}", value.as_str());
            0
        }
    }
}

/// Remove every offset directive, including ones formed by removing others.
pub fn strip_offset_directives(text: &str) -> String {
    let mut out = OFFSET_DIRECTIVE.replace_all(text, "").into_owned();
    while OFFSET_DIRECTIVE.is_match(&out) {
        out = OFFSET_DIRECTIVE.replace_all(&out, "").into_owned();
    }
    out
}
