use std::ffi::OsStr;
use std::path::Path;

use tracing::debug;

use super::process::{configured_command, detach};
use crate::config::DesktopConfig;
use crate::effects::{Desktop, HostFailure, WindowState};

/// Desktop calls mapped onto external commands.
pub(crate) struct SystemDesktop {
    open_command: Vec<String>,
    query_command: Option<Vec<String>>,
}

impl SystemDesktop {
    pub(crate) fn new(config: &DesktopConfig) -> Self {
        Self {
            open_command: config.open_command.clone(),
            query_command: config.query_command.clone(),
        }
    }
}

impl Desktop for SystemDesktop {
    fn open_object(&self, path: &Path) -> Result<(), HostFailure> {
        let Some((program, args)) = self.open_command.split_first() else {
            return Err(HostFailure::new(None, "no open command configured"));
        };
        let mut command = configured_command(OsStr::new(program), args);
        command.arg(path);
        let status = command
            .status()
            .map_err(|err| HostFailure::new(err.raw_os_error(), format!("{program}: {err}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(HostFailure::new(
                status.code(),
                format!("{program} exited with {status}"),
            ))
        }
    }

    fn window_state(&self, path: &Path) -> WindowState {
        let Some((program, args)) = self
            .query_command
            .as_ref()
            .and_then(|command| command.split_first())
        else {
            return WindowState::QueryFailed {
                transient: false,
                reason: "no window query command configured".to_string(),
            };
        };
        let mut command = configured_command(OsStr::new(program), args);
        command.arg(path);
        match command.status() {
            Ok(status) => match status.code() {
                Some(0) => WindowState::Open,
                Some(1) => WindowState::Closed,
                _ => WindowState::QueryFailed {
                    transient: true,
                    reason: format!("{program} exited with {status}"),
                },
            },
            Err(err) => WindowState::QueryFailed {
                transient: false,
                reason: format!("{program}: {err}"),
            },
        }
    }

    fn run_command(&self, line: &str) -> Result<(), HostFailure> {
        let mut command = configured_command(OsStr::new("sh"), &["-c", line]);
        detach(&mut command);
        let child = command
            .spawn()
            .map_err(|err| HostFailure::new(err.raw_os_error(), format!("sh: {err}")))?;
        debug!(pid = child.id(), command = line, "shell command started");
        Ok(())
    }
}
