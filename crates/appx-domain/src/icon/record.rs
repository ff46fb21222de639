use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::tooltypes::ToolTypes;

/// The kind tag recorded in an icon file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconType {
    Disk,
    Drawer,
    Tool,
    Project,
    Garbage,
}

impl IconType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IconType::Disk => "disk",
            IconType::Drawer => "drawer",
            IconType::Tool => "tool",
            IconType::Project => "project",
            IconType::Garbage => "garbage",
        }
    }

    /// Whether the desktop honours `default_tool` for this kind.
    #[must_use]
    pub fn uses_default_tool(self) -> bool {
        matches!(self, IconType::Project)
    }
}

impl fmt::Display for IconType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "disk" => Ok(IconType::Disk),
            "drawer" => Ok(IconType::Drawer),
            "tool" => Ok(IconType::Tool),
            "project" => Ok(IconType::Project),
            "garbage" | "trashcan" => Ok(IconType::Garbage),
            other => Err(format!("unknown icon type `{other}`")),
        }
    }
}

/// Stored on-desktop position of an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPosition {
    pub x: i16,
    pub y: i16,
}

impl IconPosition {
    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Opaque image payload; the core never looks inside.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct IconImage {
    pub data: Vec<u8>,
}

impl IconImage {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl fmt::Debug for IconImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconImage")
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// In-memory view of one icon file.
///
/// A record is plain data: cloning it duplicates the tool types, the
/// default tool and every image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRecord {
    pub kind: IconType,
    pub default_tool: Option<String>,
    pub tool_types: ToolTypes,
    pub position: Option<IconPosition>,
    pub images: Vec<IconImage>,
}

impl IconRecord {
    #[must_use]
    pub fn new(kind: IconType) -> Self {
        Self {
            kind,
            default_tool: None,
            tool_types: ToolTypes::default(),
            position: None,
            images: Vec::new(),
        }
    }

    /// Value of the first tool type whose key matches `key` case-insensitively.
    #[must_use]
    pub fn tool_type(&self, key: &str) -> Option<&str> {
        self.tool_types.find(key)
    }

    /// Default tool as the desktop would see it; drawers never carry one.
    #[must_use]
    pub fn effective_default_tool(&self) -> Option<&str> {
        if self.kind == IconType::Drawer {
            return None;
        }
        self.default_tool
            .as_deref()
            .filter(|tool| !tool.trim().is_empty())
    }

    #[must_use]
    pub fn with_kind(mut self, kind: IconType) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_default_tool(mut self, tool: impl Into<String>) -> Self {
        self.default_tool = Some(tool.into());
        self
    }

    #[must_use]
    pub fn with_tool_types(mut self, tool_types: ToolTypes) -> Self {
        self.tool_types = tool_types;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: IconPosition) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: IconImage) -> Self {
        self.images.push(image);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_type_parses_case_insensitively() {
        assert_eq!("Project".parse::<IconType>(), Ok(IconType::Project));
        assert_eq!(" DRAWER ".parse::<IconType>(), Ok(IconType::Drawer));
        assert_eq!("trashcan".parse::<IconType>(), Ok(IconType::Garbage));
        assert!("volume".parse::<IconType>().is_err());
    }

    #[test]
    fn drawers_hide_their_default_tool() {
        let icon = IconRecord::new(IconType::Drawer).with_default_tool("SYS:Utilities/AppX");
        assert_eq!(icon.effective_default_tool(), None);

        let icon = icon.with_kind(IconType::Project);
        assert_eq!(icon.effective_default_tool(), Some("SYS:Utilities/AppX"));
    }

    #[test]
    fn blank_default_tool_is_treated_as_missing() {
        let icon = IconRecord::new(IconType::Project).with_default_tool("  ");
        assert_eq!(icon.effective_default_tool(), None);
    }
}
