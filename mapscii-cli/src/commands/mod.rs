//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`inspect`] - Per-layer summary of one tile
//! - [`render`] - One-shot terminal rendering of one tile

pub mod common;
pub mod inspect;
pub mod render;
