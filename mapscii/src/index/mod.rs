//! Rectangle spatial index.
//!
//! A thin wrapper over an `rstar` R-tree: items carry a [`Bbox`] (via
//! [`Bounded`]) and are found by inclusive rectangle intersection. Tile
//! layers are bulk-loaded once; the label placer inserts one footprint at a
//! time and clears the tree every render pass.

mod bbox;
mod tree;

pub use bbox::Bbox;
pub use tree::{Bounded, SpatialIndex, TileTreeParams, WideTreeParams};
