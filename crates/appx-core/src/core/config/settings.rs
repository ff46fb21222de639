use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::effects::Qualifiers;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub trace: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// How the host icon writer treats the path it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterVariant {
    /// Appends `.info` to whatever path it receives.
    #[default]
    Append,
    /// Writes exactly the path it receives.
    Literal,
}

impl FromStr for WriterVariant {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(WriterVariant::Append),
            "literal" => Ok(WriterVariant::Literal),
            other => Err(format!("unknown icon writer `{other}`")),
        }
    }
}

/// Key that diverts a launch into drawer-view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewModifier {
    #[default]
    RShift,
    LShift,
    Shift,
    RAlt,
    LAlt,
    Control,
    LCommand,
    RCommand,
}

impl ViewModifier {
    #[must_use]
    pub fn mask(self) -> Qualifiers {
        match self {
            ViewModifier::RShift => Qualifiers::RSHIFT,
            ViewModifier::LShift => Qualifiers::LSHIFT,
            ViewModifier::Shift => Qualifiers::LSHIFT | Qualifiers::RSHIFT,
            ViewModifier::RAlt => Qualifiers::RALT,
            ViewModifier::LAlt => Qualifiers::LALT,
            ViewModifier::Control => Qualifiers::CONTROL,
            ViewModifier::LCommand => Qualifiers::LCOMMAND,
            ViewModifier::RCommand => Qualifiers::RCOMMAND,
        }
    }
}

impl fmt::Display for ViewModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewModifier::RShift => "rshift",
            ViewModifier::LShift => "lshift",
            ViewModifier::Shift => "shift",
            ViewModifier::RAlt => "ralt",
            ViewModifier::LAlt => "lalt",
            ViewModifier::Control => "control",
            ViewModifier::LCommand => "lcommand",
            ViewModifier::RCommand => "rcommand",
        };
        f.write_str(name)
    }
}

impl FromStr for ViewModifier {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rshift" => Ok(ViewModifier::RShift),
            "lshift" => Ok(ViewModifier::LShift),
            "shift" => Ok(ViewModifier::Shift),
            "ralt" => Ok(ViewModifier::RAlt),
            "lalt" => Ok(ViewModifier::LAlt),
            "control" | "ctrl" => Ok(ViewModifier::Control),
            "lcommand" | "lamiga" => Ok(ViewModifier::LCommand),
            "rcommand" | "ramiga" => Ok(ViewModifier::RCommand),
            other => Err(format!("unknown view modifier `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub(crate) icons: IconConfig,
    pub(crate) desktop: DesktopConfig,
    pub(crate) input: InputConfig,
    pub(crate) timing: ViewTiming,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let snapshot = EnvSnapshot::capture();
        Self::from_snapshot(&snapshot)
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> Self {
        let defaults = ViewTiming::default();
        Self {
            icons: IconConfig {
                writer: parsed_or_default(snapshot, "APPX_ICON_WRITER"),
            },
            desktop: DesktopConfig {
                open_command: snapshot
                    .var("APPX_OPEN_COMMAND")
                    .map_or_else(default_open_command, split_command),
                query_command: snapshot.var("APPX_QUERY_COMMAND").map(split_command),
            },
            input: InputConfig {
                view_modifier: parsed_or_default(snapshot, "APPX_VIEW_MODIFIER"),
                qualifier: snapshot.var("APPX_QUALIFIER").map(ToOwned::to_owned),
            },
            timing: ViewTiming {
                release_poll: millis_or(snapshot, "APPX_RELEASE_POLL_MS", defaults.release_poll),
                release_timeout: millis_or(
                    snapshot,
                    "APPX_RELEASE_TIMEOUT_MS",
                    defaults.release_timeout,
                ),
                close_poll: millis_or(snapshot, "APPX_CLOSE_POLL_MS", defaults.close_poll),
                close_timeout: millis_or(snapshot, "APPX_CLOSE_TIMEOUT_MS", defaults.close_timeout),
            },
        }
    }

    #[must_use]
    pub fn icons(&self) -> &IconConfig {
        &self.icons
    }

    #[must_use]
    pub fn desktop(&self) -> &DesktopConfig {
        &self.desktop
    }

    #[must_use]
    pub fn input(&self) -> &InputConfig {
        &self.input
    }

    #[must_use]
    pub fn timing(&self) -> &ViewTiming {
        &self.timing
    }

    #[must_use]
    pub fn with_writer(mut self, writer: WriterVariant) -> Self {
        self.icons.writer = writer;
        self
    }

    #[must_use]
    pub fn with_view_modifier(mut self, modifier: ViewModifier) -> Self {
        self.input.view_modifier = modifier;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: ViewTiming) -> Self {
        self.timing = timing;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IconConfig {
    pub writer: WriterVariant,
}

#[derive(Debug, Clone)]
pub struct DesktopConfig {
    pub open_command: Vec<String>,
    pub query_command: Option<Vec<String>>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            open_command: default_open_command(),
            query_command: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    pub view_modifier: ViewModifier,
    /// Raw qualifier mask exported by the desktop, parsed at probe time.
    pub qualifier: Option<String>,
}

/// Polling cadence of drawer-view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTiming {
    pub release_poll: Duration,
    pub release_timeout: Duration,
    pub close_poll: Duration,
    pub close_timeout: Duration,
}

impl Default for ViewTiming {
    fn default() -> Self {
        Self {
            release_poll: Duration::from_millis(100),
            release_timeout: Duration::from_secs(5),
            close_poll: Duration::from_millis(500),
            close_timeout: Duration::from_secs(30),
        }
    }
}

fn default_open_command() -> Vec<String> {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    vec![program.to_string()]
}

fn split_command(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(ToOwned::to_owned).collect()
}

fn parsed_or_default<T>(snapshot: &EnvSnapshot, key: &str) -> T
where
    T: FromStr<Err = String> + Default + fmt::Debug,
{
    match snapshot.var(key).map(str::parse::<T>) {
        None => T::default(),
        Some(Ok(value)) => value,
        Some(Err(reason)) => {
            let fallback = T::default();
            warn!(key, %reason, ?fallback, "ignoring invalid setting");
            fallback
        }
    }
}

fn millis_or(snapshot: &EnvSnapshot, key: &str, default: Duration) -> Duration {
    let Some(raw) = snapshot.var(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => {
            warn!(
                key,
                value = raw,
                ?default,
                "ignoring invalid duration"
            );
            default
        }
    }
}
