//! Flat `key = value` configuration files
//!
//! One pair per line. Keys and values are trimmed, blank lines and lines
//! starting with `#` are skipped, lines without `=` are ignored, and a later
//! occurrence of a key overrides an earlier one.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use tracing::warn;

use crate::error::{AssetError, ConfigError};

#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration text. Parsing itself never fails.
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            values.insert(key.trim().to_owned(), value.trim().to_owned());
        }
        Self { values }
    }

    /// Read and parse a file. A missing or empty file is an error.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))?;
        if text.trim().is_empty() {
            return Err(AssetError::Empty(path.to_path_buf()));
        }
        Ok(Self::parse(&text))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Parse the value of `key`. `Ok(None)` when the key is absent or empty.
    pub fn parse_value<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.get(key) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
                key: key.to_owned(),
                value: raw.to_owned(),
            }),
        }
    }

    /// Parsed value of `key`, falling back to `default` when it is absent
    /// or malformed. Malformed values are logged.
    pub fn get_parsed<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.parse_value(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!("{e}; using default");
                default
            }
        }
    }

    /// Boolean value: `1`, `true`, `yes`, `on` (any case) are true; `0`,
    /// `false`, `no`, `off` are false; anything else yields `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(str::to_ascii_lowercase).as_deref() {
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            _ => default,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
        # window
        width = 1280
        height=720
          title =  Ember Demo
        broken line
        vsync = off
        seed = abc
        width = 1024
        empty =
    ";

    #[test]
    fn parses_trimmed_pairs() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get("title"), Some("Ember Demo"));
        assert_eq!(cfg.get("height"), Some("720"));
        assert!(!cfg.contains("broken line"));
        assert!(!cfg.contains("# window"));
    }

    #[test]
    fn later_keys_override() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get_parsed("width", 0u32), 1024);
    }

    #[test]
    fn typed_access_falls_back() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get_parsed("missing", 7i32), 7);
        assert_eq!(cfg.get_parsed("empty", 3i32), 3);
        assert_eq!(cfg.get_parsed("seed", 42u64), 42);
        assert!(cfg.parse_value::<u64>("seed").is_err());
        assert!(!cfg.get_bool("vsync", true));
        assert!(cfg.get_bool("missing", true));
        assert_eq!(cfg.get_or("missing", "x"), "x");
    }

    #[test]
    fn equals_in_value_is_kept() {
        let cfg = Config::parse("expr = a=b");
        assert_eq!(cfg.get("expr"), Some("a=b"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load(Path::new("/nonexistent/engine.cfg")).is_err());
    }
}
