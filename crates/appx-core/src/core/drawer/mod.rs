//! Drawer-view mode.
//!
//! A toolbox drawer's icon is a project icon, so the desktop would run AppX
//! again if asked to open it. To show the drawer's window instead, the icon is
//! retyped to a drawer for as long as the window stays open and put back
//! afterwards. Every exit past [`Phase::WriteTypeDrawer`] goes through
//! [`Phase::Restore`].

use std::fmt;
use std::path::{Path, PathBuf};

use appx_domain::{IconPaths, IconRecord, IconType};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::effects::WindowState;
use crate::errors::AppxError;
use crate::icons::IconStore;

/// Consecutive transient query failures treated as a closed window.
const MAX_TRANSIENT_QUERY_FAILURES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    AwaitRelease,
    Load,
    WriteTypeDrawer,
    Flush,
    Open,
    PollClosed,
    Restore,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Enter => "enter",
            Phase::AwaitRelease => "await-release",
            Phase::Load => "load",
            Phase::WriteTypeDrawer => "write-type-drawer",
            Phase::Flush => "flush",
            Phase::Open => "open",
            Phase::PollClosed => "poll-closed",
            Phase::Restore => "restore",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawerReport {
    pub target: PathBuf,
    pub original_type: IconType,
    pub polls: u32,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct WatchSummary {
    polls: u32,
    timed_out: bool,
}

struct Coordinator<'a> {
    ctx: &'a AppContext,
    store: IconStore<'a>,
    paths: IconPaths,
    phase: Phase,
}

impl Coordinator<'_> {
    fn advance(&mut self, next: Phase) {
        debug!(
            target_path = %self.paths.target.display(),
            from = %self.phase,
            to = %next,
            "drawer view transition"
        );
        self.phase = next;
    }

    fn await_release(&self) -> Result<(), AppxError> {
        let timing = self.ctx.config().timing();
        let clock = self.ctx.clock();
        let started = clock.now();
        loop {
            match self.store.probe_readable(&self.paths) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    let waited = clock.now().saturating_duration_since(started);
                    if waited >= timing.release_timeout {
                        warn!(error = %format!("{err:#}"), "icon never became readable");
                        return Err(AppxError::ParentLockHeld {
                            path: self.paths.icon.clone(),
                            waited_ms: u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                        });
                    }
                    clock.sleep(timing.release_poll);
                }
            }
        }
    }

    fn watch_window(&self) -> WatchSummary {
        let timing = self.ctx.config().timing();
        let clock = self.ctx.clock();
        let desktop = self.ctx.desktop();
        let started = clock.now();
        let mut summary = WatchSummary::default();
        let mut transient_failures = 0;
        loop {
            if clock.now().saturating_duration_since(started) >= timing.close_timeout {
                info!(
                    polls = summary.polls,
                    "drawer window still open after the close timeout"
                );
                summary.timed_out = true;
                return summary;
            }
            clock.sleep(timing.close_poll);
            summary.polls += 1;
            match desktop.window_state(&self.paths.target) {
                WindowState::Open => transient_failures = 0,
                WindowState::Closed => return summary,
                WindowState::QueryFailed {
                    transient: false,
                    reason,
                } => {
                    debug!(%reason, "window query failed; treating drawer as closed");
                    return summary;
                }
                WindowState::QueryFailed {
                    transient: true,
                    reason,
                } => {
                    transient_failures += 1;
                    if transient_failures >= MAX_TRANSIENT_QUERY_FAILURES {
                        warn!(%reason, "window query keeps failing; treating drawer as closed");
                        return summary;
                    }
                }
            }
        }
    }

    /// Writes the loaded type back over a fresh read of the icon, so edits
    /// made while the window was open survive.
    fn restore(&self, loaded: &IconRecord) -> Result<(), AppxError> {
        let mut icon = match self.store.load(&self.paths) {
            Ok(icon) => icon,
            Err(err) => {
                warn!(
                    error = %format!("{err:#}"),
                    "reloading icon for restore failed; writing the loaded copy"
                );
                loaded.clone()
            }
        };
        icon.kind = loaded.kind;
        // drawers do not persist a default tool
        if icon.default_tool.is_none() {
            icon.default_tool.clone_from(&loaded.default_tool);
        }
        self.store
            .save(&self.paths, &icon, false)
            .map(drop)
            .map_err(|err| AppxError::RestoreFailed {
                path: self.paths.icon.clone(),
                original: loaded.kind,
                reason: format!("{err:#}"),
            })
    }
}

/// Shows a toolbox drawer's window by temporarily retyping its icon.
pub fn view_drawer(ctx: &AppContext, target: &Path) -> Result<DrawerReport, AppxError> {
    let paths = IconPaths::new(target)?;
    let mut run = Coordinator {
        ctx,
        store: IconStore::new(ctx.icons()),
        paths,
        phase: Phase::Enter,
    };

    run.advance(Phase::AwaitRelease);
    run.await_release()?;

    run.advance(Phase::Load);
    let loaded = run
        .store
        .load(&run.paths)
        .map_err(|err| AppxError::icon_unavailable(&run.paths.icon, &err))?;
    let original_type = loaded.kind;

    run.advance(Phase::WriteTypeDrawer);
    let viewing = loaded.clone().with_kind(IconType::Drawer);
    run.store
        .save(&run.paths, &viewing, false)
        .map_err(|err| AppxError::WriteFailed {
            path: run.paths.icon.clone(),
            reason: format!("{err:#}"),
        })?;

    run.advance(Phase::Flush);
    if let Err(err) = run.store.sync(&run.paths) {
        warn!(error = %format!("{err:#}"), "icon flush failed");
    }

    run.advance(Phase::Open);
    let watched = match ctx.desktop().open_object(&run.paths.target) {
        Ok(()) => {
            run.advance(Phase::PollClosed);
            Ok(run.watch_window())
        }
        Err(failure) => Err(AppxError::OpenRejected {
            path: run.paths.target.clone(),
            code: failure.code,
            reason: failure.reason,
        }),
    };

    run.advance(Phase::Restore);
    let restored = run.restore(&loaded);
    run.advance(Phase::Done);

    match (watched, restored) {
        (Ok(summary), Ok(())) => {
            info!(
                target_path = %run.paths.target.display(),
                original = %original_type,
                polls = summary.polls,
                "drawer view finished"
            );
            Ok(DrawerReport {
                target: run.paths.target,
                original_type,
                polls: summary.polls,
                timed_out: summary.timed_out,
            })
        }
        (Ok(_), Err(restore_err)) => Err(restore_err),
        (Err(open_err), Ok(())) => Err(open_err),
        (Err(open_err), Err(restore_err)) => {
            warn!(error = %open_err, "desktop refused to open the drawer");
            Err(restore_err)
        }
    }
}
