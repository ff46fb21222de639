//! Converting a drawer into a toolbox drawer.

use std::path::{Path, PathBuf};

use appx_domain::{
    check_path, join_checked, IconPaths, IconRecord, IconType, UpsertMode, TOOLBOX_KEY,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::effects::EntryKind;
use crate::errors::AppxError;
use crate::icons::IconStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxRequest {
    pub drawer: PathBuf,
    pub tool: String,
    pub copy_image: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Drawer,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolboxReport {
    pub icon_path: PathBuf,
    pub default_tool: String,
    pub tool_types: Vec<String>,
    pub replaced_existing: bool,
    pub image_source: ImageSource,
}

/// Rewrites the drawer's icon so double-clicking it runs `request.tool`.
///
/// Rebuilding an existing toolbox drawer is accepted and converges on the
/// same icon.
pub fn build_toolbox(
    ctx: &AppContext,
    request: &ToolboxRequest,
) -> Result<ToolboxReport, AppxError> {
    let tool_name = validate_tool_name(&request.tool)?;
    if request.drawer.as_os_str().is_empty() {
        return Err(AppxError::invalid_arguments("No directory specified"));
    }
    let drawer = IconPaths::new(&request.drawer)?;
    let tool = IconPaths::new(&join_checked(&drawer.target, tool_name)?)?;
    let program = ctx.program_path();
    check_path(&program)?;

    let store = IconStore::new(ctx.icons());
    let fs = ctx.fs();

    match fs.entry_kind(&drawer.target) {
        Ok(Some(EntryKind::Directory)) => {}
        Ok(_) => {
            return Err(AppxError::NotADrawer {
                path: drawer.target.clone(),
                reason: "Not a directory".to_string(),
            })
        }
        Err(err) => {
            return Err(AppxError::NotADrawer {
                path: drawer.target.clone(),
                reason: format!("{err:#}"),
            })
        }
    }
    let drawer_icon = store
        .load(&drawer)
        .map_err(|err| AppxError::icon_unavailable(&drawer.icon, &err))?;
    if !accepts_drawer_icon(&drawer_icon) {
        return Err(AppxError::NotADrawer {
            path: drawer.target.clone(),
            reason: format!("its icon is a {} icon", drawer_icon.kind),
        });
    }

    match fs.entry_kind(&tool.target) {
        Ok(Some(EntryKind::File { .. })) => {}
        Ok(Some(EntryKind::Directory)) => {
            return Err(AppxError::NotATool {
                path: tool.target.clone(),
                reason: "it is a directory".to_string(),
            })
        }
        Ok(None) => {
            return Err(AppxError::NotATool {
                path: tool.target.clone(),
                reason: "no such file in the drawer".to_string(),
            })
        }
        Err(err) => {
            return Err(AppxError::NotATool {
                path: tool.target.clone(),
                reason: format!("{err:#}"),
            })
        }
    }
    let tool_icon = store
        .load(&tool)
        .map_err(|err| AppxError::icon_unavailable(&tool.icon, &err))?;
    if tool_icon.kind != IconType::Tool {
        return Err(AppxError::NotATool {
            path: tool.target.clone(),
            reason: format!("its icon is a {} icon", tool_icon.kind),
        });
    }

    let replaced_existing = drawer_icon.tool_types.contains(TOOLBOX_KEY);
    let image_source = if request.copy_image {
        ImageSource::Tool
    } else {
        ImageSource::Drawer
    };
    let toolbox = compose(&drawer_icon, &tool_icon, tool_name, &program, image_source)?;

    match store.delete(&drawer) {
        Ok(true) => debug!(drawer = %drawer.target.display(), "old drawer icon removed"),
        Ok(false) => {}
        Err(err) => warn!(
            drawer = %drawer.target.display(),
            error = %format!("{err:#}"),
            "could not remove old drawer icon"
        ),
    }
    store
        .save(&drawer, &toolbox, true)
        .map_err(|err| AppxError::BuildFailed {
            path: drawer.icon.clone(),
            reason: format!("{err:#}"),
        })?;

    info!(
        drawer = %drawer.target.display(),
        tool = tool_name,
        replaced_existing,
        "toolbox drawer written"
    );
    Ok(ToolboxReport {
        icon_path: drawer.icon,
        default_tool: program.display().to_string(),
        tool_types: toolbox.tool_types.to_strings(),
        replaced_existing,
        image_source,
    })
}

/// Builds the toolbox icon without touching the disk.
fn compose(
    drawer: &IconRecord,
    tool: &IconRecord,
    tool_name: &str,
    program: &Path,
    image_source: ImageSource,
) -> Result<IconRecord, AppxError> {
    let tool_types = drawer
        .tool_types
        .upsert(TOOLBOX_KEY, tool_name, UpsertMode::ReplaceInPlace)
        .map_err(|err| AppxError::invalid_arguments(err.to_string()))?;
    let images = match image_source {
        ImageSource::Drawer => drawer.images.clone(),
        ImageSource::Tool => tool.images.clone(),
    };
    Ok(IconRecord {
        kind: IconType::Project,
        default_tool: Some(program.display().to_string()),
        tool_types,
        position: drawer.position,
        images,
    })
}

fn accepts_drawer_icon(icon: &IconRecord) -> bool {
    match icon.kind {
        IconType::Drawer => true,
        IconType::Project => icon
            .tool_type(TOOLBOX_KEY)
            .is_some_and(|tool| !tool.is_empty()),
        IconType::Tool | IconType::Disk | IconType::Garbage => false,
    }
}

fn validate_tool_name(raw: &str) -> Result<&str, AppxError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppxError::invalid_arguments("TOOL needs a program name"));
    }
    if name.contains(['/', '\n', '\r']) || name == "." || name == ".." {
        return Err(AppxError::invalid_arguments(format!(
            "TOOL must name a file directly inside the drawer, got `{name}`"
        )));
    }
    Ok(name)
}
