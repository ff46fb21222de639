//! Configuration, settings, and the application context.

pub mod context;
pub mod settings;

pub use settings::*;
