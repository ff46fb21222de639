#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod icon;
pub mod paths;

pub use icon::{
    parse_icon, render_icon, CodecError, IconImage, IconPosition, IconRecord, IconType, ToolType,
    ToolTypeError, ToolTypes, UpsertMode, ICON_FORMAT_VERSION, TOOLBOX_KEY,
};
pub use paths::{
    check_path, icon_path_for, join_checked, IconPaths, PathError, INFO_SUFFIX, MAX_PATH_LEN,
};
