use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

use crate::context::PROGRAM_NAME;
use crate::effects::Processes;

pub(crate) struct SystemProcesses;

impl Processes for SystemProcesses {
    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<()> {
        let mut command = configured_command(program.as_os_str(), args);
        detach(&mut command);
        let child = command
            .spawn()
            .with_context(|| format!("failed to start {}", program.display()))?;
        debug!(pid = child.id(), program = %program.display(), "detached worker started");
        Ok(())
    }

    fn program_path(&self) -> Option<PathBuf> {
        env::current_exe()
            .ok()
            .or_else(|| which::which(PROGRAM_NAME).ok())
    }
}

/// A command with null stdio, ready to be configured further.
pub(crate) fn configured_command<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    command.stdin(Stdio::null());
    command.stdout(Stdio::null());
    command.stderr(Stdio::null());
    command
}

/// Puts the child in its own process group so it outlives the launcher.
pub(crate) fn detach(command: &mut Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    #[cfg(not(unix))]
    {
        let _ = command;
    }
}
