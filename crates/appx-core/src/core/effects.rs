use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use appx_domain::IconRecord;
use bitflags::bitflags;
use thiserror::Error;

use crate::config::Config;
use crate::core::host::{
    SystemClock, SystemDesktop, SystemFileSystem, SystemIconCodec, SystemModifierProbe,
    SystemProcesses,
};

/// Host icon library.
///
/// Reads always target `<target>.info`. Writes and deletes take the path as
/// the caller gives it; whether the writer appends `.info` itself depends on
/// the host variant, which is why [`crate::icons::IconStore`] tries both forms.
pub trait IconCodec: Send + Sync {
    fn get_icon(&self, target: &Path) -> Result<IconRecord>;
    fn put_icon(&self, path: &Path, icon: &IconRecord, notify: bool) -> Result<()>;
    fn delete_icon(&self, path: &Path) -> Result<()>;
    fn open_for_read(&self, path: &Path) -> Result<()>;
    fn flush(&self, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File { executable: bool },
}

pub trait FileSystem: Send + Sync {
    /// `None` when nothing exists at `path`.
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>>;
    fn current_dir(&self) -> Result<PathBuf>;
    fn set_current_dir(&self, path: &Path) -> Result<()>;
    fn absolute(&self, path: &Path) -> Result<PathBuf>;
}

/// Failure reported by a desktop call, with the host's own error code when
/// it supplied one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct HostFailure {
    pub code: Option<i32>,
    pub reason: String,
}

impl HostFailure {
    pub fn new(code: Option<i32>, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowState {
    Open,
    Closed,
    /// `transient` failures may clear up on the next poll.
    QueryFailed { transient: bool, reason: String },
}

pub trait Desktop: Send + Sync {
    fn open_object(&self, path: &Path) -> Result<(), HostFailure>;
    fn window_state(&self, path: &Path) -> WindowState;
    /// Starts `command` through the shell without waiting for it.
    fn run_command(&self, command: &str) -> Result<(), HostFailure>;
}

pub trait Processes: Send + Sync {
    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<()>;
    /// Location of the running launcher, if the host can tell.
    fn program_path(&self) -> Option<PathBuf>;
}

bitflags! {
    /// Input-event qualifier mask in the desktop's bit layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Qualifiers: u16 {
        const LSHIFT = 0x0001;
        const RSHIFT = 0x0002;
        const CAPSLOCK = 0x0004;
        const CONTROL = 0x0008;
        const LALT = 0x0010;
        const RALT = 0x0020;
        const LCOMMAND = 0x0040;
        const RCOMMAND = 0x0080;
    }
}

pub trait ModifierProbe: Send + Sync {
    /// `None` when the input source cannot be reached.
    fn qualifiers(&self) -> Option<Qualifiers>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

pub trait Effects: Send + Sync {
    fn icons(&self) -> &dyn IconCodec;
    fn fs(&self) -> &dyn FileSystem;
    fn desktop(&self) -> &dyn Desktop;
    fn processes(&self) -> &dyn Processes;
    fn input(&self) -> &dyn ModifierProbe;
    fn clock(&self) -> &dyn Clock;
}

pub struct SystemEffects {
    icons: Arc<SystemIconCodec>,
    fs: Arc<SystemFileSystem>,
    desktop: Arc<SystemDesktop>,
    processes: Arc<SystemProcesses>,
    input: Arc<SystemModifierProbe>,
    clock: Arc<SystemClock>,
}

impl SystemEffects {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            icons: Arc::new(SystemIconCodec::new(config.icons().writer)),
            fs: Arc::new(SystemFileSystem),
            desktop: Arc::new(SystemDesktop::new(config.desktop())),
            processes: Arc::new(SystemProcesses),
            input: Arc::new(SystemModifierProbe::new(config.input().qualifier.clone())),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Effects for SystemEffects {
    fn icons(&self) -> &dyn IconCodec {
        self.icons.as_ref()
    }

    fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    fn desktop(&self) -> &dyn Desktop {
        self.desktop.as_ref()
    }

    fn processes(&self) -> &dyn Processes {
        self.processes.as_ref()
    }

    fn input(&self) -> &dyn ModifierProbe {
        self.input.as_ref()
    }

    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

pub type SharedEffects = Arc<dyn Effects>;
