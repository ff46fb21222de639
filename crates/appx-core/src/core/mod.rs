//! Internal implementation modules for `appx-core`.
//!
//! Callers go through the re-exports in the crate root.

pub mod commands;
pub mod config;
pub mod drawer;
pub mod effects;
pub(crate) mod host;
pub mod icons;
pub mod launch;
pub mod toolbox;
pub mod tooling;

#[cfg(test)]
pub(crate) mod test_support;
