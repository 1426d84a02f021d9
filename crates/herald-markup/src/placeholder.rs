//! `{key}` placeholder substitution.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("valid regex"));

/// Replace `{key}` tokens with values from `values`. Unknown keys are kept
/// verbatim, braces included.
pub fn replace_placeholders(text: &str, values: &BTreeMap<String, String>) -> String {
    if values.is_empty() || !text.contains('{') {
        return text.to_string();
    }
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("server".to_string(), "Lobby".to_string()),
            ("price".to_string(), "$5".to_string()),
        ])
    }

    #[test]
    fn test_replace_known_keys() {
        assert_eq!(replace_placeholders("Welcome to {server}!", &values()), "Welcome to Lobby!");
        assert_eq!(replace_placeholders("{price} {price}", &values()), "$5 $5");
    }

    #[test]
    fn test_unknown_keys_kept() {
        assert_eq!(replace_placeholders("{player} joined", &values()), "{player} joined");
        assert_eq!(replace_placeholders("{not a key}", &values()), "{not a key}");
    }

    #[test]
    fn test_empty_map_is_noop() {
        assert_eq!(replace_placeholders("{server}", &BTreeMap::new()), "{server}");
    }
}
