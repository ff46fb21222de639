//! Command facade: each mode runs to an [`ExecutionOutcome`] the CLI renders.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::context::{AppContext, CommandInfo, PROGRAM_NAME};
use crate::core::drawer;
use crate::core::launch::{launch_targets, LaunchRecord};
use crate::core::toolbox::{build_toolbox, ToolboxRequest};
use crate::errors::AppxError;
use crate::outcome::{CommandStatus, ExecutionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandGroup {
    View,
    Toolbox,
    Launch,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandGroup::View => "view",
            CommandGroup::Toolbox => "toolbox",
            CommandGroup::Launch => "launch",
        };
        f.write_str(name)
    }
}

/// `DRAWER=<path>`: show a toolbox drawer's window.
pub fn view_drawer(ctx: &AppContext, target: &Path) -> ExecutionOutcome {
    match drawer::view_drawer(ctx, target) {
        Ok(report) => {
            let message = if report.timed_out {
                format!(
                    "stopped watching {} after the close timeout; icon restored",
                    report.target.display()
                )
            } else {
                format!("viewed {}", report.target.display())
            };
            ExecutionOutcome::success(
                message,
                json!({
                    "target": report.target.display().to_string(),
                    "original_type": report.original_type,
                    "polls": report.polls,
                    "timed_out": report.timed_out,
                }),
            )
        }
        Err(err) => failed(err),
    }
}

/// `TOOLBOX=<drawer> TOOL=<name> [COPYIMAGE]`: convert a drawer.
pub fn make_toolbox(ctx: &AppContext, request: &ToolboxRequest) -> ExecutionOutcome {
    match build_toolbox(ctx, request) {
        Ok(report) => ExecutionOutcome::success(
            format!(
                "{} now launches {}",
                request.drawer.display(),
                request.tool.trim()
            ),
            json!({
                "icon": report.icon_path.display().to_string(),
                "default_tool": report.default_tool,
                "tool_types": report.tool_types,
                "replaced_existing": report.replaced_existing,
                "image_source": report.image_source,
            }),
        ),
        Err(err) => failed(err),
    }
}

/// Positional targets: launch each toolbox drawer's tool.
pub fn launch(ctx: &AppContext, targets: &[PathBuf]) -> ExecutionOutcome {
    if targets.is_empty() {
        return AppxError::invalid_arguments("No directory specified").into_outcome();
    }
    let summary = launch_targets(ctx, targets);
    let launched: Vec<Value> = summary.launched.iter().map(launch_details).collect();
    if summary.is_success() {
        let message = match summary.launched.as_slice() {
            [only] => format!("launched {}", only.inner.display()),
            many => format!("launched {} tools", many.len()),
        };
        return ExecutionOutcome::success(message, json!({ "launched": launched }));
    }

    let failures: Vec<Value> = summary
        .failures
        .iter()
        .map(|(target, err)| {
            let mut details = err.details();
            if let Some(map) = details.as_object_mut() {
                map.insert("target".into(), json!(target.display().to_string()));
                map.insert("message".into(), json!(err.to_string()));
            }
            details
        })
        .collect();
    let message = match summary.failures.as_slice() {
        [(_, err)] if targets.len() == 1 => err.to_string(),
        all => format!("{} of {} targets failed", all.len(), targets.len()),
    };
    let details = json!({ "launched": launched, "failures": failures });
    let status = summary
        .failures
        .iter()
        .map(|(_, err)| err.status())
        .max()
        .unwrap_or(CommandStatus::UserError);
    ExecutionOutcome::new(status, message, details)
}

fn launch_details(record: &LaunchRecord) -> Value {
    json!({
        "target": record.target.display().to_string(),
        "tool": record.tool,
        "inner": record.inner.display().to_string(),
        "action": record.action,
    })
}

fn failed(err: AppxError) -> ExecutionOutcome {
    warn!(code = err.code(), error = %err, "command failed");
    err.into_outcome()
}

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome) -> Value {
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": outcome.status.as_str(),
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let group_name = info.group.to_string();
    let prefix = if group_name == info.name {
        format!("{PROGRAM_NAME} {}", info.name)
    } else {
        format!("{PROGRAM_NAME} {group_name} {}", info.name)
    };
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}
