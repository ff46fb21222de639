//! Direct launch: double-clicking a toolbox drawer runs its tool.

mod probe;
mod scope;

use std::path::{Path, PathBuf};

use appx_domain::{check_path, join_checked, IconPaths, TOOLBOX_KEY};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::effects::EntryKind;
use crate::errors::AppxError;
use crate::icons::IconStore;

pub use probe::is_view_modifier_held;
pub use scope::DirectoryScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchAction {
    /// A detached `appx DRAWER=...` worker shows the drawer window.
    ViewerSpawned,
    /// The tool is executable and was started as a shell command.
    ShellCommand,
    /// The tool was handed to the desktop's "open object".
    OpenedObject,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchRecord {
    pub target: PathBuf,
    pub tool: String,
    pub inner: PathBuf,
    pub action: LaunchAction,
}

#[derive(Debug, Default)]
pub struct LaunchSummary {
    pub launched: Vec<LaunchRecord>,
    pub failures: Vec<(PathBuf, AppxError)>,
}

impl LaunchSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Launches every target, carrying on past individual failures.
pub fn launch_targets(ctx: &AppContext, targets: &[PathBuf]) -> LaunchSummary {
    let mut summary = LaunchSummary::default();
    for target in targets {
        match launch_target(ctx, target) {
            Ok(record) => summary.launched.push(record),
            Err(err) => {
                warn!(path = %target.display(), code = err.code(), error = %err, "launch failed");
                summary.failures.push((target.clone(), err));
            }
        }
    }
    summary
}

pub fn launch_target(ctx: &AppContext, target: &Path) -> Result<LaunchRecord, AppxError> {
    if target.as_os_str().is_empty() {
        return Err(AppxError::invalid_arguments("No directory specified"));
    }
    let fs = ctx.fs();
    let absolute = fs.absolute(target).map_err(|err| AppxError::NotADrawer {
        path: target.to_path_buf(),
        reason: format!("{err:#}"),
    })?;
    let paths = IconPaths::new(&absolute)?;

    let _scope = match paths.target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Some(
            DirectoryScope::enter(fs, parent).map_err(|err| AppxError::NotADrawer {
                path: paths.target.clone(),
                reason: format!("{err:#}"),
            })?,
        ),
        _ => None,
    };

    if !matches!(fs.entry_kind(&paths.target), Ok(Some(EntryKind::Directory))) {
        return Err(AppxError::NotADrawer {
            path: paths.target.clone(),
            reason: "AppX only works with toolbox drawer icons".to_string(),
        });
    }
    let icon = IconStore::new(ctx.icons())
        .load(&paths)
        .map_err(|err| AppxError::icon_unavailable(&paths.icon, &err))?;
    let tool = icon
        .tool_type(TOOLBOX_KEY)
        .map(str::trim)
        .filter(|tool| !tool.is_empty())
        .ok_or_else(|| AppxError::NotAToolbox {
            path: paths.target.clone(),
        })?
        .to_string();
    let inner = join_checked(&paths.target, &tool)?;

    let record = |action| LaunchRecord {
        target: paths.target.clone(),
        tool: tool.clone(),
        inner: inner.clone(),
        action,
    };

    if is_view_modifier_held(ctx.input(), ctx.config().input().view_modifier) {
        let program = ctx.program_path();
        let argument = format!("DRAWER={}", paths.target.display());
        check_path(&program)?;
        check_path(Path::new(&argument))?;
        let args = vec![argument];
        ctx.processes()
            .spawn_detached(&program, &args)
            .map_err(|err| AppxError::SpawnFailed {
                program: program.clone(),
                reason: format!("{err:#}"),
            })?;
        info!(drawer = %paths.target.display(), program = %program.display(), "drawer viewer started");
        return Ok(record(LaunchAction::ViewerSpawned));
    }

    if !confirm_launch(&inner) {
        debug!(tool = %inner.display(), "launch declined");
        return Ok(record(LaunchAction::Declined));
    }

    let executable = matches!(
        fs.entry_kind(&inner),
        Ok(Some(EntryKind::File { executable: true }))
    );
    let (action, outcome) = if executable {
        let command = shell_quote(&inner);
        (LaunchAction::ShellCommand, ctx.desktop().run_command(&command))
    } else {
        (LaunchAction::OpenedObject, ctx.desktop().open_object(&inner))
    };
    outcome.map_err(|failure| AppxError::LaunchFailed {
        path: inner.clone(),
        code: failure.code,
        reason: failure.reason,
    })?;
    info!(tool = %inner.display(), ?action, "tool launched");
    Ok(record(action))
}

/// Hook for asking the user before launching; currently always proceeds.
fn confirm_launch(_tool: &Path) -> bool {
    true
}

fn shell_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests;
