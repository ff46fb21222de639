use appx_core::{CommandInfo, CommandStatus, ExecutionOutcome};
use atty::Stream;
use color_eyre::Result;
use serde_json::Value;

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

/// Renders `outcome` and returns the process exit code.
///
/// Errors go to stderr even under `--quiet`.
pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = outcome.exit_code();

    if opts.json {
        let payload = appx_core::to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    if outcome.status == CommandStatus::Ok {
        if !opts.quiet {
            let style = Style::new(opts.no_color, atty::is(Stream::Stdout));
            let message = appx_core::format_status_message(info, &outcome.message);
            println!("{}", style.status(outcome.status, &message));
        }
    } else {
        let style = Style::new(opts.no_color, atty::is(Stream::Stderr));
        eprintln!("{}", render_failure(&style, info, outcome));
    }
    Ok(code)
}

fn render_failure(style: &Style, info: CommandInfo, outcome: &ExecutionOutcome) -> String {
    let message = appx_core::format_status_message(info, &outcome.message);
    let header = match error_code(&outcome.details) {
        Some(code) => format!("{code}  {message}"),
        None => message,
    };
    let mut lines = vec![style.error_header(outcome.status, &header)];

    let why = collect_why_bullets(&outcome.details);
    if !why.is_empty() {
        lines.push(String::new());
        lines.push("Why:".to_string());
        lines.extend(why.iter().map(|reason| format!("  • {reason}")));
    }
    let fixes = collect_fix_bullets(&outcome.details);
    if !fixes.is_empty() {
        lines.push(String::new());
        lines.push("Fix:".to_string());
        lines.extend(
            fixes
                .iter()
                .map(|fix| style.fix_bullet(&format!("  • {fix}"))),
        );
    }
    lines.join("\n")
}

fn error_code(details: &Value) -> Option<&str> {
    details.get("code").and_then(Value::as_str)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

fn collect_why_bullets(details: &Value) -> Vec<String> {
    let mut bullets = Vec::new();
    if let Some(reason) = details.get("reason").and_then(Value::as_str) {
        if let Some(text) = reason_display(reason) {
            push_unique(&mut bullets, text);
        }
    }
    if let Some(code) = details.get("host_code").and_then(Value::as_i64) {
        push_unique(&mut bullets, format!("Desktop error code {code}"));
    }
    if let Some(original) = details.get("original_type").and_then(Value::as_str) {
        push_unique(
            &mut bullets,
            format!("The icon should be a {original} icon but is still a drawer icon."),
        );
    }
    if let Some(failures) = details.get("failures").and_then(Value::as_array) {
        for failure in failures {
            let target = failure.get("target").and_then(Value::as_str);
            let message = failure.get("message").and_then(Value::as_str);
            if let (Some(target), Some(message)) = (target, message) {
                push_unique(&mut bullets, format!("{target}: {message}"));
            }
        }
    }
    bullets
}

fn collect_fix_bullets(details: &Value) -> Vec<String> {
    let mut fixes = Vec::new();
    if let Some(hint) = hint_from_details(details) {
        push_unique(&mut fixes, hint);
    }
    if let Some(failures) = details.get("failures").and_then(Value::as_array) {
        for hint in failures
            .iter()
            .filter_map(|failure| failure.get("hint").and_then(Value::as_str))
        {
            push_unique(&mut fixes, hint);
        }
    }
    fixes
}

fn push_unique(vec: &mut Vec<String>, text: impl Into<String>) {
    let entry = text.into();
    if entry.trim().is_empty() {
        return;
    }
    if !vec.iter().any(|existing| existing == &entry) {
        vec.push(entry);
    }
}

fn reason_display(reason: &str) -> Option<&'static str> {
    match reason {
        "not_a_toolbox" => Some("The drawer icon has no TOOLBOX tool type."),
        "parent_lock_held" => Some("Another program kept the icon busy."),
        "restore_failed" => Some("The icon could not be switched back after viewing."),
        _ => None,
    }
}
