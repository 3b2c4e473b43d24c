//! Flat key/value configuration files.
//!
//! Line-oriented: `key = value` or `key: value`, one pair per line.
//! Blank lines and lines starting with `#` or `!` are ignored; keys and
//! values are trimmed. A line with no separator is a key with an empty
//! value. Loaded wholesale before any row is processed, immutable after.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// An immutable key/value settings object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    entries: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings from a file.
    ///
    /// # Errors
    /// An I/O error if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Parse settings from text. Unparseable lines cannot occur: every
    /// non-comment line is either a pair or a bare key.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            match line.find(['=', ':']) {
                Some(at) => {
                    let (key, rest) = line.split_at(at);
                    let value = rest.get(1..).unwrap_or("");
                    entries.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => {
                    entries.insert(line.to_string(), String::new());
                }
            }
        }
        Self { entries }
    }

    /// Look up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a key, falling back to `default`.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}
