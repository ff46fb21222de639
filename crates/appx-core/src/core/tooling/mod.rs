//! Outcome shaping and the typed error kinds surfaced to the CLI.

pub mod errors;
pub mod outcome;
