#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::config::context;
pub(crate) use crate::core::effects;
pub(crate) use crate::core::icons;
pub(crate) use crate::core::tooling::{errors, outcome};

pub use crate::core::commands::{
    format_status_message, launch, make_toolbox, to_json_response, view_drawer, CommandGroup,
};
pub use crate::core::config::context::{AppContext, CommandInfo, PROGRAM_NAME};
pub use crate::core::config::{
    Config, DesktopConfig, GlobalOptions, IconConfig, InputConfig, ViewModifier, ViewTiming,
    WriterVariant,
};
pub use crate::core::drawer::{view_drawer as run_drawer_view, DrawerReport};
pub use crate::core::effects::{
    Clock, Desktop, Effects, EntryKind, FileSystem, HostFailure, IconCodec, ModifierProbe,
    Processes, Qualifiers, SharedEffects, SystemEffects, WindowState,
};
pub use crate::core::launch::{
    is_view_modifier_held, launch_target, launch_targets, DirectoryScope, LaunchAction,
    LaunchRecord, LaunchSummary,
};
pub use crate::core::toolbox::{build_toolbox, ImageSource, ToolboxReport, ToolboxRequest};
pub use crate::core::tooling::errors::AppxError;
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};
