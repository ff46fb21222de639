//! Target and icon path handling.
//!
//! Every path the launcher constructs goes through [`join_checked`] or
//! [`IconPaths::new`] so overlong paths are refused before any I/O.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Suffix of the companion icon file.
pub const INFO_SUFFIX: &str = ".info";

/// Longest path, in bytes, the launcher will construct.
pub const MAX_PATH_LEN: usize = 511;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is too long ({len} bytes, limit {limit}): {path}")]
    TooLong {
        path: String,
        len: usize,
        limit: usize,
    },
    #[error("no path given")]
    Empty,
}

/// A target together with its companion icon path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPaths {
    pub target: PathBuf,
    pub icon: PathBuf,
}

impl IconPaths {
    /// Accepts either the target or its `.info` path.
    pub fn new(input: &Path) -> Result<Self, PathError> {
        let raw = input.to_string_lossy();
        let trimmed = trim_trailing_separator(&raw);
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }
        let target = trimmed.strip_suffix(INFO_SUFFIX).unwrap_or(trimmed);
        if target.is_empty() {
            return Err(PathError::Empty);
        }
        let icon = format!("{target}{INFO_SUFFIX}");
        check_len(&icon)?;
        Ok(Self {
            target: PathBuf::from(target),
            icon: PathBuf::from(icon),
        })
    }

    /// The target file name, or the whole target when it has none.
    #[must_use]
    pub fn name(&self) -> String {
        self.target.file_name().map_or_else(
            || self.target.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// Appends `.info` to `target`.
pub fn icon_path_for(target: &Path) -> Result<PathBuf, PathError> {
    IconPaths::new(target).map(|paths| paths.icon)
}

/// Joins `name` onto `dir`, refusing results longer than [`MAX_PATH_LEN`].
pub fn join_checked(dir: &Path, name: &str) -> Result<PathBuf, PathError> {
    let joined = dir.join(name);
    check_len(&joined.to_string_lossy())?;
    Ok(joined)
}

pub fn check_path(path: &Path) -> Result<(), PathError> {
    check_len(&path.to_string_lossy())
}

fn check_len(path: &str) -> Result<(), PathError> {
    if path.len() > MAX_PATH_LEN {
        return Err(PathError::TooLong {
            path: path.to_string(),
            len: path.len(),
            limit: MAX_PATH_LEN,
        });
    }
    Ok(())
}

fn trim_trailing_separator(raw: &str) -> &str {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() && raw.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}
