use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, GlobalOptions};
use crate::core::commands::CommandGroup;
use crate::effects::{self, Effects, SharedEffects, SystemEffects};

/// Bare executable name used when the launcher cannot locate itself.
pub const PROGRAM_NAME: &str = "appx";

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

/// Process-wide state threaded through every operation.
pub struct AppContext {
    pub global: GlobalOptions,
    config: Config,
    effects: SharedEffects,
}

impl AppContext {
    /// Context backed by the real host, configured from the environment.
    #[must_use]
    pub fn from_env(global: GlobalOptions) -> Self {
        let config = Config::from_env();
        let effects: SharedEffects = Arc::new(SystemEffects::new(&config));
        Self::new(global, config, effects)
    }

    #[must_use]
    pub fn new(global: GlobalOptions, config: Config, effects: SharedEffects) -> Self {
        Self {
            global,
            config,
            effects,
        }
    }

    pub fn effects(&self) -> &dyn Effects {
        self.effects.as_ref()
    }

    pub fn shared_effects(&self) -> SharedEffects {
        self.effects.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn icons(&self) -> &dyn effects::IconCodec {
        self.effects.icons()
    }

    pub fn fs(&self) -> &dyn effects::FileSystem {
        self.effects.fs()
    }

    pub fn desktop(&self) -> &dyn effects::Desktop {
        self.effects.desktop()
    }

    pub fn processes(&self) -> &dyn effects::Processes {
        self.effects.processes()
    }

    pub fn input(&self) -> &dyn effects::ModifierProbe {
        self.effects.input()
    }

    pub fn clock(&self) -> &dyn effects::Clock {
        self.effects.clock()
    }

    /// Path of the running launcher, or its bare name when unknown.
    pub fn program_path(&self) -> PathBuf {
        self.processes()
            .program_path()
            .unwrap_or_else(|| PathBuf::from(PROGRAM_NAME))
    }
}
