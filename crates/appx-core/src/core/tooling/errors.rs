use std::path::{Path, PathBuf};

use appx_domain::{IconType, PathError};
use serde_json::{json, Value};
use thiserror::Error;

use crate::outcome::{CommandStatus, ExecutionOutcome};

/// Every way a launcher operation can fail.
///
/// Adapter errors arrive as `anyhow::Error` and are flattened into `reason`
/// with their full context chain.
#[derive(Debug, Error)]
pub enum AppxError {
    #[error("{message}")]
    InvalidArguments { message: String },
    #[error("No TOOLBOX tooltype found in {}", path.display())]
    NotAToolbox { path: PathBuf },
    #[error("{} is not a drawer: {reason}", path.display())]
    NotADrawer { path: PathBuf, reason: String },
    #[error("{} is not a tool: {reason}", path.display())]
    NotATool { path: PathBuf, reason: String },
    #[error("icon for {} is unavailable: {reason}", path.display())]
    IconUnavailable { path: PathBuf, reason: String },
    #[error("Path too long ({len} bytes, limit {limit}): {path}")]
    PathTooLong {
        path: String,
        len: usize,
        limit: usize,
    },
    #[error("icon for {} stayed busy for {waited_ms} ms", path.display())]
    ParentLockHeld { path: PathBuf, waited_ms: u64 },
    #[error("failed to retype icon for {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },
    #[error("failed to write toolbox icon for {}: {reason}", path.display())]
    BuildFailed { path: PathBuf, reason: String },
    #[error("desktop refused to open {}: {reason}", path.display())]
    OpenRejected {
        path: PathBuf,
        code: Option<i32>,
        reason: String,
    },
    #[error("icon for {} was left as a drawer; restoring {original} failed: {reason}", path.display())]
    RestoreFailed {
        path: PathBuf,
        original: IconType,
        reason: String,
    },
    #[error("failed to launch {}: {reason}", path.display())]
    LaunchFailed {
        path: PathBuf,
        code: Option<i32>,
        reason: String,
    },
    #[error("failed to start drawer viewer {}: {reason}", program.display())]
    SpawnFailed { program: PathBuf, reason: String },
}

impl AppxError {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        AppxError::InvalidArguments {
            message: message.into(),
        }
    }

    pub(crate) fn icon_unavailable(path: &Path, err: &anyhow::Error) -> Self {
        AppxError::IconUnavailable {
            path: path.to_path_buf(),
            reason: format!("{err:#}"),
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            AppxError::InvalidArguments { .. } => "APPX100",
            AppxError::NotAToolbox { .. } => "APPX101",
            AppxError::NotADrawer { .. } => "APPX102",
            AppxError::NotATool { .. } => "APPX103",
            AppxError::IconUnavailable { .. } => "APPX104",
            AppxError::PathTooLong { .. } => "APPX105",
            AppxError::ParentLockHeld { .. } => "APPX201",
            AppxError::WriteFailed { .. } => "APPX202",
            AppxError::BuildFailed { .. } => "APPX203",
            AppxError::OpenRejected { .. } => "APPX204",
            AppxError::RestoreFailed { .. } => "APPX205",
            AppxError::LaunchFailed { .. } => "APPX206",
            AppxError::SpawnFailed { .. } => "APPX207",
        }
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            AppxError::InvalidArguments { .. } => "invalid_arguments",
            AppxError::NotAToolbox { .. } => "not_a_toolbox",
            AppxError::NotADrawer { .. } => "not_a_drawer",
            AppxError::NotATool { .. } => "not_a_tool",
            AppxError::IconUnavailable { .. } => "icon_unavailable",
            AppxError::PathTooLong { .. } => "path_too_long",
            AppxError::ParentLockHeld { .. } => "parent_lock_held",
            AppxError::WriteFailed { .. } => "write_failed",
            AppxError::BuildFailed { .. } => "build_failed",
            AppxError::OpenRejected { .. } => "open_rejected",
            AppxError::RestoreFailed { .. } => "restore_failed",
            AppxError::LaunchFailed { .. } => "launch_failed",
            AppxError::SpawnFailed { .. } => "spawn_failed",
        }
    }

    #[must_use]
    pub fn status(&self) -> CommandStatus {
        match self {
            AppxError::InvalidArguments { .. }
            | AppxError::NotAToolbox { .. }
            | AppxError::NotADrawer { .. }
            | AppxError::NotATool { .. }
            | AppxError::IconUnavailable { .. }
            | AppxError::PathTooLong { .. } => CommandStatus::UserError,
            AppxError::ParentLockHeld { .. }
            | AppxError::WriteFailed { .. }
            | AppxError::BuildFailed { .. }
            | AppxError::OpenRejected { .. }
            | AppxError::RestoreFailed { .. }
            | AppxError::LaunchFailed { .. }
            | AppxError::SpawnFailed { .. } => CommandStatus::Failure,
        }
    }

    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppxError::NotAToolbox { .. } => {
                Some("Convert the drawer first with `appx TOOLBOX=<drawer> TOOL=<name>`.")
            }
            AppxError::NotADrawer { .. } => Some("AppX only works with toolbox drawer icons."),
            AppxError::NotATool { .. } => {
                Some("TOOL must name a program inside the drawer whose icon is a tool icon.")
            }
            AppxError::RestoreFailed { .. } => {
                Some("Re-run `appx DRAWER=<drawer>` to put the original icon type back.")
            }
            AppxError::ParentLockHeld { .. } => {
                Some("Close any window that still has the icon open and try again.")
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<String> {
        match self {
            AppxError::InvalidArguments { .. } => None,
            AppxError::PathTooLong { path, .. } => Some(path.clone()),
            AppxError::SpawnFailed { program, .. } => Some(program.display().to_string()),
            AppxError::NotAToolbox { path }
            | AppxError::NotADrawer { path, .. }
            | AppxError::NotATool { path, .. }
            | AppxError::IconUnavailable { path, .. }
            | AppxError::ParentLockHeld { path, .. }
            | AppxError::WriteFailed { path, .. }
            | AppxError::BuildFailed { path, .. }
            | AppxError::OpenRejected { path, .. }
            | AppxError::RestoreFailed { path, .. }
            | AppxError::LaunchFailed { path, .. } => Some(path.display().to_string()),
        }
    }

    #[must_use]
    pub fn details(&self) -> Value {
        let mut details = json!({
            "code": self.code(),
            "reason": self.reason(),
        });
        if let Some(map) = details.as_object_mut() {
            if let Some(path) = self.path() {
                map.insert("path".into(), Value::String(path));
            }
            if let Some(hint) = self.hint() {
                map.insert("hint".into(), Value::String(hint.to_string()));
            }
            match self {
                AppxError::OpenRejected { code: Some(code), .. }
                | AppxError::LaunchFailed { code: Some(code), .. } => {
                    map.insert("host_code".into(), json!(code));
                }
                AppxError::RestoreFailed { original, .. } => {
                    map.insert("original_type".into(), json!(original));
                }
                _ => {}
            }
        }
        details
    }

    #[must_use]
    pub fn into_outcome(self) -> ExecutionOutcome {
        let details = self.details();
        let message = self.to_string();
        ExecutionOutcome::new(self.status(), message, details)
    }
}

impl From<PathError> for AppxError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::TooLong { path, len, limit } => AppxError::PathTooLong { path, len, limit },
            PathError::Empty => AppxError::invalid_arguments("No directory specified"),
        }
    }
}
