//! Ordered `KEY=VALUE` env-file model
//!
//! [`EnvFile`] keeps every line of the source in order. Comments, blank
//! lines and unparseable lines are carried through untouched, and entries
//! that were never assigned keep their original text, so saving an
//! unmodified file reproduces it apart from line endings.

use crate::env::FileEnv;
use crate::error::{IoResultExt, SetupError, SetupResult};
use std::fmt;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Entry {
        key: String,
        value: String,
        /// Source text, dropped once the value is reassigned
        raw: Option<String>,
    },
    /// An earlier assignment of `key` overridden by a later line
    Shadowed { key: String, raw: String },
    Raw(String),
}

/// Ordered, case-sensitive key/value store backed by env-file text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    lines: Vec<Line>,
}

impl EnvFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse env-file text
    ///
    /// A line is an entry when it is not blank, does not start with `#`,
    /// and has a non-empty key before its first `=`. A repeated key keeps
    /// the position of its first occurrence and the value of its last; the
    /// later lines stay in the text until the key is assigned.
    pub fn parse(text: &str) -> Self {
        let mut file = Self::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                file.lines.push(Line::Raw(line.to_string()));
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    let key = key.trim();
                    if let Some(current) = file.value_mut(key) {
                        debug!("Duplicate env key {}, keeping last value", key);
                        *current = value.to_string();
                        file.lines.push(Line::Shadowed {
                            key: key.to_string(),
                            raw: line.to_string(),
                        });
                    } else {
                        file.lines.push(Line::Entry {
                            key: key.to_string(),
                            value: value.to_string(),
                            raw: Some(line.to_string()),
                        });
                    }
                }
                _ => file.lines.push(Line::Raw(line.to_string())),
            }
        }
        file
    }

    /// Load and parse an env file
    pub fn load(fs: &dyn FileEnv, path: &Path) -> SetupResult<Self> {
        let text = fs.read_to_string(path).at_path(path)?;
        let file = Self::parse(&text);
        debug!("Loaded {} entries from {}", file.len(), path.display());
        Ok(file)
    }

    /// Serialize and write the env file
    pub fn save(&self, fs: &dyn FileEnv, path: &Path) -> SetupResult<()> {
        fs.write(path, &self.to_string()).at_path(path)?;
        debug!("Saved {} entries to {}", self.len(), path.display());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Assign a value, in place when the key exists, appended otherwise
    ///
    /// Fails without changing anything when the pair cannot be written as a
    /// single `KEY=VALUE` line that parses back to the same pair.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> SetupResult<()> {
        let key = key.into();
        let value = value.into();
        check_key(&key)?;
        check_value(&key, &value)?;

        self.lines
            .retain(|line| !matches!(line, Line::Shadowed { key: shadowed, .. } if *shadowed == key));

        for line in &mut self.lines {
            if let Line::Entry {
                key: existing,
                value: current,
                raw,
            } = line
            {
                if *existing == key {
                    *current = value;
                    *raw = None;
                    return Ok(());
                }
            }
        }

        self.lines.push(Line::Entry {
            key,
            value,
            raw: None,
        });
        Ok(())
    }

    /// Assign every pair in order; later pairs win
    ///
    /// Stops at the first pair that cannot be written.
    pub fn apply<I, K, V>(&mut self, pairs: I) -> SetupResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Entries in file order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry { key, value, .. } => Some((key.as_str(), value.as_str())),
            Line::Shadowed { .. } | Line::Raw(_) => None,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn value_mut(&mut self, key: &str) -> Option<&mut String> {
        self.lines.iter_mut().find_map(|line| match line {
            Line::Entry {
                key: existing,
                value,
                ..
            } if existing.as_str() == key => Some(value),
            _ => None,
        })
    }
}

fn check_key(key: &str) -> SetupResult<()> {
    let problem = if key.is_empty() {
        Some("is empty")
    } else if key.trim() != key {
        Some("has surrounding whitespace")
    } else if key.starts_with('#') {
        Some("starts with '#'")
    } else if key.contains('=') {
        Some("contains '='")
    } else if key.contains(['\n', '\r']) {
        Some("contains a line break")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(SetupError::config(format!(
            "env key {key:?} {problem}"
        ))),
        None => Ok(()),
    }
}

fn check_value(key: &str, value: &str) -> SetupResult<()> {
    if value.contains(['\n', '\r']) {
        return Err(SetupError::config(format!(
            "value for env key {key} contains a line break"
        )));
    }
    Ok(())
}

impl fmt::Display for EnvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Entry { raw: Some(raw), .. }
                | Line::Shadowed { raw, .. }
                | Line::Raw(raw) => writeln!(f, "{raw}")?,
                Line::Entry { key, value, .. } => writeln!(f, "{key}={value}")?,
            }
        }
        Ok(())
    }
}
