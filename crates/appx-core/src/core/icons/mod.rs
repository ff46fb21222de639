//! Companion icon file access.

mod store;

pub use store::{IconStore, WrittenVia};
