use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use appx_domain::{IconRecord, IconType, ToolTypes};

use super::{launch_target, launch_targets, LaunchAction};
use crate::config::{Config, ViewModifier};
use crate::core::test_support::{Event, FakeHost};
use crate::effects::{HostFailure, Qualifiers};
use crate::errors::AppxError;

const DRAWER: &str = "/work/Games";

fn toolbox(tool: &str) -> IconRecord {
    IconRecord::new(IconType::Project)
        .with_default_tool("/opt/appx/bin/appx")
        .with_tool_types(ToolTypes::parse(["SHOW=ICONS".to_string(), format!("TOOLBOX={tool}")]))
}

fn games_host() -> Arc<FakeHost> {
    let host = FakeHost::new();
    host.add_dir(DRAWER);
    host.set_icon(DRAWER, &toolbox("Frotz"));
    host.add_file("/work/Games/Frotz", true);
    host.add_file("/work/Games/Manual.guide", false);
    host
}

fn is_read(event: &Event) -> bool {
    matches!(event, Event::ReadQualifiers)
}

#[test]
fn executable_tool_runs_as_a_shell_command() -> Result<()> {
    let host = games_host();
    let ctx = host.context(Config::default());

    let record = launch_target(&ctx, Path::new(DRAWER))?;
    assert_eq!(record.action, LaunchAction::ShellCommand);
    assert_eq!(record.tool, "Frotz");
    assert_eq!(record.inner, PathBuf::from("/work/Games/Frotz"));
    assert!(host
        .events()
        .contains(&Event::Command("'/work/Games/Frotz'".to_string())));
    Ok(())
}

#[test]
fn other_files_are_opened_by_the_desktop() -> Result<()> {
    let host = games_host();
    host.set_icon(DRAWER, &toolbox("Manual.guide"));
    let ctx = host.context(Config::default());

    let record = launch_target(&ctx, Path::new(DRAWER))?;
    assert_eq!(record.action, LaunchAction::OpenedObject);
    assert!(host
        .events()
        .contains(&Event::Open(PathBuf::from("/work/Games/Manual.guide"))));
    assert_eq!(host.count(|event| matches!(event, Event::Command(_))), 0);
    Ok(())
}

#[test]
fn held_modifier_spawns_the_drawer_viewer() -> Result<()> {
    let host = games_host();
    host.set_qualifiers(Some(Qualifiers::RSHIFT));
    let ctx = host.context(Config::default());

    let record = launch_target(&ctx, Path::new(DRAWER))?;
    assert_eq!(record.action, LaunchAction::ViewerSpawned);
    assert!(host.events().contains(&Event::Spawn(
        PathBuf::from("/opt/appx/bin/appx"),
        vec!["DRAWER=/work/Games".to_string()],
    )));
    assert_eq!(host.count(|event| matches!(event, Event::Open(_))), 0);
    assert_eq!(host.count(|event| matches!(event, Event::Command(_))), 0);
    Ok(())
}

#[test]
fn modifier_is_sampled_once_per_target() -> Result<()> {
    for qualifiers in [None, Some(Qualifiers::RSHIFT), Some(Qualifiers::LALT)] {
        let host = games_host();
        host.set_qualifiers(qualifiers);
        let ctx = host.context(Config::default());
        launch_target(&ctx, Path::new(DRAWER))?;
        assert_eq!(host.count(is_read), 1, "{qualifiers:?}");
    }
    Ok(())
}

#[test]
fn configured_modifier_replaces_right_shift() -> Result<()> {
    let host = games_host();
    host.set_qualifiers(Some(Qualifiers::RSHIFT));
    let ctx = host.context(Config::default().with_view_modifier(ViewModifier::Control));
    assert_eq!(
        launch_target(&ctx, Path::new(DRAWER))?.action,
        LaunchAction::ShellCommand
    );

    host.set_qualifiers(Some(Qualifiers::CONTROL));
    assert_eq!(
        launch_target(&ctx, Path::new(DRAWER))?.action,
        LaunchAction::ViewerSpawned
    );
    Ok(())
}

#[test]
fn viewer_spawn_failure_is_reported() {
    let host = games_host();
    host.set_qualifiers(Some(Qualifiers::RSHIFT));
    host.fail_spawns();
    let ctx = host.context(Config::default());

    let err = launch_target(&ctx, Path::new(DRAWER)).unwrap_err();
    assert!(matches!(err, AppxError::SpawnFailed { .. }));
}

#[test]
fn desktop_error_code_is_carried() {
    let host = games_host();
    host.fail_commands(HostFailure::new(Some(20), "object not found"));
    let ctx = host.context(Config::default());

    let err = launch_target(&ctx, Path::new(DRAWER)).unwrap_err();
    assert!(matches!(
        err,
        AppxError::LaunchFailed {
            code: Some(20),
            ..
        }
    ));
}

#[test]
fn icons_without_a_toolbox_entry_are_refused() {
    let host = games_host();
    let ctx = host.context(Config::default());
    for tool_types in [vec!["SHOW=ICONS"], vec!["TOOLBOX="], vec!["TOOLBOX=   "]] {
        host.set_icon(
            DRAWER,
            &IconRecord::new(IconType::Project)
                .with_default_tool("/opt/appx/bin/appx")
                .with_tool_types(ToolTypes::parse(tool_types.clone())),
        );
        let err = launch_target(&ctx, Path::new(DRAWER)).unwrap_err();
        assert!(matches!(err, AppxError::NotAToolbox { .. }), "{tool_types:?}");
    }
    assert_eq!(host.count(is_read), 0);
}

#[test]
fn plain_files_are_not_drawers() {
    let host = games_host();
    let ctx = host.context(Config::default());

    let err = launch_target(&ctx, Path::new("/work/Games/Frotz")).unwrap_err();
    assert!(matches!(err, AppxError::NotADrawer { .. }));
    let err = launch_target(&ctx, Path::new("/work/Missing")).unwrap_err();
    assert!(matches!(err, AppxError::NotADrawer { .. }));
}

#[test]
fn relative_targets_resolve_against_the_cwd_and_the_cwd_is_restored() -> Result<()> {
    let host = games_host();
    host.add_dir("/home/user");
    host.set_cwd("/work");
    let ctx = host.context(Config::default());

    let record = launch_target(&ctx, Path::new("Games"))?;
    assert_eq!(record.target, PathBuf::from(DRAWER));
    assert_eq!(host.cwd(), PathBuf::from("/work"));

    host.set_cwd("/home/user");
    host.clear_events();
    launch_target(&ctx, Path::new(DRAWER))?;
    assert_eq!(host.cwd(), PathBuf::from("/home/user"));
    assert_eq!(
        host.events().first(),
        Some(&Event::Chdir(PathBuf::from("/work")))
    );
    Ok(())
}

#[test]
fn failures_do_not_stop_the_remaining_targets() {
    let host = games_host();
    host.add_dir("/work/Plain");
    let ctx = host.context(Config::default());

    let summary = launch_targets(
        &ctx,
        &[
            PathBuf::from("/work/Plain"),
            PathBuf::from(DRAWER),
            PathBuf::from("/work/Games/Frotz"),
        ],
    );
    assert!(!summary.is_success());
    assert_eq!(summary.launched.len(), 1);
    assert_eq!(summary.failures.len(), 2);
    assert!(matches!(summary.failures[0].1, AppxError::IconUnavailable { .. }));
    assert!(matches!(summary.failures[1].1, AppxError::NotADrawer { .. }));
}

#[test]
fn overlong_worker_command_is_refused_before_spawning() {
    let host = games_host();
    host.set_qualifiers(Some(Qualifiers::RSHIFT));
    host.set_program(Some(PathBuf::from(format!("/{}", "p".repeat(600)))));
    let ctx = host.context(Config::default());

    let err = launch_target(&ctx, Path::new(DRAWER)).unwrap_err();
    assert!(matches!(err, AppxError::PathTooLong { .. }));
    assert_eq!(host.count(|event| matches!(event, Event::Spawn(..))), 0);
}

#[test]
fn shell_commands_quote_the_tool_path() {
    assert_eq!(
        super::shell_quote(Path::new("/work/Tom's Games/Frotz")),
        r"'/work/Tom'\''s Games/Frotz'"
    );
}
