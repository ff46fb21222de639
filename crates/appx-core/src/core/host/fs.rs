use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::effects::{EntryKind, FileSystem};

pub(crate) struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to stat {}", path.display()))
            }
        };
        if meta.is_dir() {
            return Ok(Some(EntryKind::Directory));
        }
        Ok(Some(EntryKind::File {
            executable: is_executable(&meta),
        }))
    }

    fn current_dir(&self) -> Result<PathBuf> {
        env::current_dir().context("failed to read the current directory")
    }

    fn set_current_dir(&self, path: &Path) -> Result<()> {
        env::set_current_dir(path)
            .with_context(|| format!("failed to change directory to {}", path.display()))
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        std::path::absolute(path)
            .with_context(|| format!("failed to resolve {}", path.display()))
    }
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    false
}

/// Whether any cause in `err` is an `io::ErrorKind::NotFound`.
pub(crate) fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
    })
}
