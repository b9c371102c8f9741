//! Key-file reader
//!
//! The format is the desktop-entry style used by GLib:
//!
//! ```text
//! # comment
//! [Group]
//! key=value
//! ```
//!
//! Syntax is handled by `rust-ini`. On top of the parsed sections this keeps
//! a flat group/key map where repeated groups are merged and the last value
//! of a repeated key wins, and offers typed reads that fail per key.

use std::collections::HashMap;

use ini::{Ini, ParseError, ParseOption};
use thiserror::Error;

/// Failure to read one value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyFileError {
    #[error("key '{key}' not found in group '{group}'")]
    KeyNotFound { group: String, key: String },

    #[error("value '{value}' of key '{group}.{key}' is not a {expected}")]
    InvalidValue {
        group: String,
        key: String,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Default, Clone)]
pub struct KeyFile {
    groups: HashMap<String, HashMap<String, String>>,
}

impl KeyFile {
    /// Parse key-file text. Backslash escapes in values are resolved.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: true,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options)?;

        let mut groups: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (section, properties) in ini.iter() {
            // Keys ahead of the first group header belong to no group.
            let Some(section) = section else {
                continue;
            };
            let entries = groups.entry(section.to_string()).or_default();
            for (key, value) in properties.iter() {
                entries.insert(key.to_string(), value.to_string());
            }
        }
        Ok(Self { groups })
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    fn raw(&self, group: &str, key: &str) -> Result<&str, KeyFileError> {
        self.groups
            .get(group)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
            .ok_or_else(|| KeyFileError::KeyNotFound {
                group: group.to_string(),
                key: key.to_string(),
            })
    }

    fn invalid(group: &str, key: &str, value: &str, expected: &'static str) -> KeyFileError {
        KeyFileError::InvalidValue {
            group: group.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    pub fn get_string(&self, group: &str, key: &str) -> Result<String, KeyFileError> {
        self.raw(group, key).map(str::to_string)
    }

    /// Accepts `true`, `false`, `1` and `0`.
    pub fn get_bool(&self, group: &str, key: &str) -> Result<bool, KeyFileError> {
        let raw = self.raw(group, key)?;
        match raw {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(Self::invalid(group, key, raw, "boolean")),
        }
    }

    /// Decimal integer with an optional sign.
    pub fn get_integer(&self, group: &str, key: &str) -> Result<i32, KeyFileError> {
        let raw = self.raw(group, key)?;
        raw.parse::<i32>()
            .map_err(|_| Self::invalid(group, key, raw, "integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# leading comment
[Font]
font = Monospace 12

[Misc]
audible-bell=true
scrollback-lines=-5
urgent-on-bell=maybe
";

    #[test]
    fn test_parse_groups_and_values() {
        let file = KeyFile::parse(SAMPLE).unwrap();
        assert!(file.has_group("Font"));
        assert!(!file.has_group("Colors"));
        assert_eq!(file.get_string("Font", "font").unwrap(), "Monospace 12");
        assert_eq!(file.get_bool("Misc", "audible-bell"), Ok(true));
        assert_eq!(file.get_integer("Misc", "scrollback-lines"), Ok(-5));
    }

    #[test]
    fn test_missing_and_invalid_are_distinct() {
        let file = KeyFile::parse(SAMPLE).unwrap();
        assert!(matches!(
            file.get_bool("Misc", "use-scrollbar"),
            Err(KeyFileError::KeyNotFound { .. })
        ));
        assert!(matches!(
            file.get_bool("Misc", "urgent-on-bell"),
            Err(KeyFileError::InvalidValue { .. })
        ));
        assert!(matches!(
            file.get_integer("Font", "font"),
            Err(KeyFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_keys_are_case_sensitive_and_group_scoped() {
        let file =
            KeyFile::parse("[Misc]\nAudible-Bell=true\n[Other]\naudible-bell=true\n").unwrap();
        assert!(file.get_bool("Misc", "audible-bell").is_err());
        assert_eq!(file.get_bool("Other", "audible-bell"), Ok(true));
    }

    #[test]
    fn test_last_value_wins_and_groups_merge() {
        let file = KeyFile::parse("[Misc]\nrows=10\n[Font]\nfont=A\n[Misc]\nrows=20\n").unwrap();
        assert_eq!(file.get_integer("Misc", "rows"), Ok(20));
        assert_eq!(file.get_string("Font", "font").unwrap(), "A");
    }

    #[test]
    fn test_keys_outside_groups_are_ignored() {
        let file = KeyFile::parse("rows=3\n[Misc]\ncolumns=4\n").unwrap();
        assert!(file.get_integer("Misc", "rows").is_err());
        assert_eq!(file.get_integer("Misc", "columns"), Ok(4));
    }

    #[test]
    fn test_unterminated_group_header_fails() {
        assert!(KeyFile::parse("[Misc\naudible-bell=true\n").is_err());
    }

    #[test]
    fn test_escapes_are_resolved() {
        let file = KeyFile::parse("[A]\nk=one\\ttwo\\nthree\n").unwrap();
        assert_eq!(file.get_string("A", "k").unwrap(), "one\ttwo\nthree");
    }

    #[test]
    fn test_hash_inside_value_is_kept() {
        let file = KeyFile::parse("[Colors]\nforeground=#102030\n").unwrap();
        assert_eq!(file.get_string("Colors", "foreground").unwrap(), "#102030");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let file = KeyFile::parse("[A]\nk=a=b\n").unwrap();
        assert_eq!(file.get_string("A", "k").unwrap(), "a=b");
    }
}
