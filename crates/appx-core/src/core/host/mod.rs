//! Adapters binding the effect traits to a POSIX desktop.

mod clock;
mod desktop;
mod fs;
mod icons;
mod input;
mod process;

pub(crate) use clock::SystemClock;
pub(crate) use desktop::SystemDesktop;
pub(crate) use fs::{is_not_found, SystemFileSystem};
pub(crate) use icons::SystemIconCodec;
pub(crate) use input::SystemModifierProbe;
pub(crate) use process::SystemProcesses;
