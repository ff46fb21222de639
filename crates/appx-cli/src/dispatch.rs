use std::path::PathBuf;

use appx_core::{AppContext, CommandGroup, CommandInfo, ExecutionOutcome, ToolboxRequest};
use tracing::debug;

use crate::cli::AppxCli;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    View(PathBuf),
    Toolbox(ToolboxRequest),
    Launch(Vec<PathBuf>),
}

impl Mode {
    pub fn info(&self) -> CommandInfo {
        match self {
            Mode::View(_) => CommandInfo::new(CommandGroup::View, "view"),
            Mode::Toolbox(_) => CommandInfo::new(CommandGroup::Toolbox, "toolbox"),
            Mode::Launch(_) => CommandInfo::new(CommandGroup::Launch, "launch"),
        }
    }
}

pub fn mode_from_cli(cli: &AppxCli) -> Mode {
    if let Some(drawer) = &cli.drawer {
        return Mode::View(drawer.clone());
    }
    if let Some(drawer) = &cli.toolbox {
        return Mode::Toolbox(ToolboxRequest {
            drawer: drawer.clone(),
            tool: cli.tool.clone().unwrap_or_default(),
            copy_image: cli.copy_image,
        });
    }
    Mode::Launch(cli.targets.clone())
}

pub fn dispatch(ctx: &AppContext, mode: &Mode) -> (CommandInfo, ExecutionOutcome) {
    let info = mode.info();
    debug!(group = %info.group, "dispatching");
    let outcome = match mode {
        Mode::View(target) => appx_core::view_drawer(ctx, target),
        Mode::Toolbox(request) => appx_core::make_toolbox(ctx, request),
        Mode::Launch(targets) => appx_core::launch(ctx, targets),
    };
    (info, outcome)
}
