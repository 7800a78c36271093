//! CLI command implementations.

mod common;
pub mod devices;
pub mod live;
pub mod render;
