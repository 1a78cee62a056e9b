//! Configuration.
//!
//! [`MapConfig`] carries every tunable of the library. Values default to
//! the constants in [`defaults`].

pub mod defaults;
mod map;

pub use map::MapConfig;
