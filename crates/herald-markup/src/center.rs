//! Fixed-width centering.

use crate::width::visible_width;

/// Number of leading spaces that center `text` in `target_width` columns,
/// shifted by `offset`. Always within `0..=target_width`.
pub fn leading_spaces(text: &str, target_width: usize, offset: i32) -> usize {
    let width = i64::try_from(target_width).unwrap_or(i64::MAX);
    let free = width.saturating_sub(visible_width(text) as i64);
    let spaces = free.div_euclid(2).saturating_add(i64::from(offset));
    spaces.clamp(0, width) as usize
}

/// Prefix `text` with enough spaces to center it. Markup is kept intact.
///
/// Directives must already be stripped: an `<offset:N>` left in `text` is
/// measured as a zero-width tag and its value is ignored here.
pub fn center(text: &str, target_width: usize, offset: i32) -> String {
    let spaces = leading_spaces(text, target_width, offset);
    let mut out = String::with_capacity(spaces + text.len());
    out.extend(std::iter::repeat_n(' ', spaces));
    out.push_str(text);
    out
}
