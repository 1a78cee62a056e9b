//! Styled tile model and the builder that produces it.
//!
//! ```text
//! DecodedTile ──▶ TileIndexBuilder ──▶ Tile
//!                   │ Styler::style_for       ├── Layer "water" ─ SpatialIndex<StyledNode>
//!                   │ color memo              └── Layer "road"  ─ SpatialIndex<StyledNode>
//!                   └ label lookup
//! ```

mod builder;
mod types;

pub use crate::coord::TileId;
pub use builder::TileIndexBuilder;
pub use types::{Layer, StyledNode, Tile};
