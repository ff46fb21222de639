use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;
use toml_edit::{Array, ArrayOfTables, DocumentMut, Item, Table, Value as TomlValue};

use super::record::{IconImage, IconPosition, IconRecord, IconType};
use super::tooltypes::ToolTypes;

pub const ICON_FORMAT_VERSION: i64 = 1;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("icon file is not valid TOML: {0}")]
    Parse(#[from] toml_edit::TomlError),
    #[error("icon file is missing `{0}`")]
    MissingField(&'static str),
    #[error("icon field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("icon image {index} is not valid base64")]
    InvalidImage {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },
    #[error("icon format version {0} is newer than this build understands")]
    UnsupportedVersion(i64),
    #[error("project icons require a default tool")]
    MissingDefaultTool,
}

/// Parses the TOML text of an icon file.
pub fn parse_icon(contents: &str) -> Result<IconRecord, CodecError> {
    let doc: DocumentMut = contents.parse()?;
    let version = doc
        .get("version")
        .and_then(Item::as_integer)
        .unwrap_or(ICON_FORMAT_VERSION);
    if version > ICON_FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let kind = doc
        .get("type")
        .and_then(Item::as_str)
        .ok_or(CodecError::MissingField("type"))?
        .parse::<IconType>()
        .map_err(|reason| CodecError::InvalidField {
            field: "type",
            reason,
        })?;

    let default_tool = if kind == IconType::Drawer {
        None
    } else {
        doc.get("default_tool")
            .and_then(Item::as_str)
            .filter(|tool| !tool.is_empty())
            .map(std::string::ToString::to_string)
    };

    let tool_types = match doc.get("tool_types") {
        None => ToolTypes::default(),
        Some(item) => {
            let array = item.as_array().ok_or(CodecError::InvalidField {
                field: "tool_types",
                reason: "expected an array of strings".to_string(),
            })?;
            let mut entries = Vec::with_capacity(array.len());
            for value in array {
                let entry = value.as_str().ok_or(CodecError::InvalidField {
                    field: "tool_types",
                    reason: "expected an array of strings".to_string(),
                })?;
                entries.push(entry);
            }
            ToolTypes::parse(entries)
        }
    };

    let position = match doc.get("position").and_then(Item::as_table_like) {
        None => None,
        Some(table) => {
            let x = coordinate(table.get("x"), "position.x")?;
            let y = coordinate(table.get("y"), "position.y")?;
            Some(IconPosition::new(x, y))
        }
    };

    let mut images = Vec::new();
    if let Some(tables) = doc.get("images").and_then(Item::as_array_of_tables) {
        for (index, table) in tables.iter().enumerate() {
            let encoded = table.get("data").and_then(Item::as_str).unwrap_or_default();
            let data = BASE64
                .decode(encoded.trim())
                .map_err(|source| CodecError::InvalidImage { index, source })?;
            images.push(IconImage::new(data));
        }
    }

    Ok(IconRecord {
        kind,
        default_tool,
        tool_types,
        position,
        images,
    })
}

/// Renders a record as the full contents of an icon file.
pub fn render_icon(icon: &IconRecord) -> Result<String, CodecError> {
    if icon.kind == IconType::Project && icon.effective_default_tool().is_none() {
        return Err(CodecError::MissingDefaultTool);
    }

    let mut doc = DocumentMut::new();
    doc.insert("version", Item::Value(TomlValue::from(ICON_FORMAT_VERSION)));
    doc.insert("type", Item::Value(TomlValue::from(icon.kind.as_str())));
    if let Some(tool) = icon.effective_default_tool() {
        doc.insert("default_tool", Item::Value(TomlValue::from(tool)));
    }

    let mut tool_types = Array::new();
    for entry in icon.tool_types.to_strings() {
        tool_types.push(entry);
    }
    doc.insert("tool_types", Item::Value(TomlValue::Array(tool_types)));

    if let Some(position) = icon.position {
        let mut table = Table::new();
        table.insert("x", Item::Value(TomlValue::from(i64::from(position.x))));
        table.insert("y", Item::Value(TomlValue::from(i64::from(position.y))));
        doc.insert("position", Item::Table(table));
    }

    if !icon.images.is_empty() {
        let mut images = ArrayOfTables::new();
        for image in &icon.images {
            let mut table = Table::new();
            table.insert(
                "data",
                Item::Value(TomlValue::from(BASE64.encode(&image.data))),
            );
            images.push(table);
        }
        doc.insert("images", Item::ArrayOfTables(images));
    }

    Ok(doc.to_string())
}

fn coordinate(item: Option<&Item>, field: &'static str) -> Result<i16, CodecError> {
    let raw = item
        .and_then(Item::as_integer)
        .ok_or(CodecError::InvalidField {
            field,
            reason: "expected an integer".to_string(),
        })?;
    i16::try_from(raw).map_err(|_| CodecError::InvalidField {
        field,
        reason: format!("{raw} is outside the 16-bit coordinate range"),
    })
}
