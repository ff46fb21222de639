//! Icon records as they are stored in `<target>.info` companion files.

mod codec;
mod record;
mod tooltypes;

pub use codec::{parse_icon, render_icon, CodecError, ICON_FORMAT_VERSION};
pub use record::{IconImage, IconPosition, IconRecord, IconType};
pub use tooltypes::{ToolType, ToolTypeError, ToolTypes, UpsertMode, TOOLBOX_KEY};
