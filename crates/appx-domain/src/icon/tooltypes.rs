use std::fmt;

use thiserror::Error;

/// Tool type naming the inner tool of a toolbox drawer.
pub const TOOLBOX_KEY: &str = "TOOLBOX";

/// One `KEY=VALUE` entry. Bare switches carry an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolType {
    pub key: String,
    pub value: String,
    /// `false` for switches stored without `=`.
    pub assigned: bool,
}

impl ToolType {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            assigned: true,
        }
    }

    /// Splits a stored entry at its first `=`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((key, value)) => Self::new(key, value),
            None => Self {
                key: raw.to_string(),
                value: String::new(),
                assigned: false,
            },
        }
    }

    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.assigned {
            write!(f, "{}={}", self.key, self.value)
        } else {
            f.write_str(&self.key)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    /// Overwrite the first matching entry where it stands; later duplicates go.
    ReplaceInPlace,
    /// Drop every matching entry and append the new one.
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolTypeError {
    #[error("tool type key is empty")]
    EmptyKey,
    #[error("tool type key `{0}` contains `=` or a line break")]
    InvalidKey(String),
    #[error("value for tool type `{key}` contains a line break")]
    InvalidValue { key: String },
}

/// Ordered tool type vector; the first entry for a key is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolTypes(Vec<ToolType>);

impl ToolTypes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .map(|entry| ToolType::parse(entry.as_ref()))
                .collect(),
        )
    }

    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[ToolType] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn find(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.matches(key))
            .map(|entry| entry.value.as_str())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|entry| entry.matches(key))
    }

    /// Returns a fresh vector with `key=value` set according to `mode`.
    ///
    /// Entries for other keys keep their order and bytes.
    pub fn upsert(&self, key: &str, value: &str, mode: UpsertMode) -> Result<Self, ToolTypeError> {
        validate_key(key)?;
        if value.contains(['\n', '\r']) {
            return Err(ToolTypeError::InvalidValue {
                key: key.to_string(),
            });
        }
        let fresh = ToolType::new(key, value);
        let mut out = Vec::with_capacity(self.0.len() + 1);
        match mode {
            UpsertMode::ReplaceInPlace => {
                let mut placed = false;
                for entry in &self.0 {
                    if entry.matches(key) {
                        if !placed {
                            out.push(fresh.clone());
                            placed = true;
                        }
                    } else {
                        out.push(entry.clone());
                    }
                }
                if !placed {
                    out.push(fresh);
                }
            }
            UpsertMode::Append => {
                out.extend(self.0.iter().filter(|entry| !entry.matches(key)).cloned());
                out.push(fresh);
            }
        }
        Ok(Self(out))
    }

    /// Returns a fresh vector without any entry for `key`.
    pub fn remove(&self, key: &str) -> Result<Self, ToolTypeError> {
        validate_key(key)?;
        Ok(Self(
            self.0
                .iter()
                .filter(|entry| !entry.matches(key))
                .cloned()
                .collect(),
        ))
    }
}

impl<'a> IntoIterator for &'a ToolTypes {
    type Item = &'a ToolType;
    type IntoIter = std::slice::Iter<'a, ToolType>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn validate_key(key: &str) -> Result<(), ToolTypeError> {
    if key.is_empty() {
        return Err(ToolTypeError::EmptyKey);
    }
    if key.contains(['=', '\n', '\r']) {
        return Err(ToolTypeError::InvalidKey(key.to_string()));
    }
    Ok(())
}
