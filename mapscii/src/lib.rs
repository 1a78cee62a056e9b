//! mapscii - vector tile maps rendered as terminal text
//!
//! This library loads Mapbox Vector Tiles from a tile server or a local
//! MBTiles archive, styles and spatially indexes their features, and
//! rasterizes map content into braille (or block-character) cells with
//! ANSI colors and overlap-free labels.
//!
//! # Pipeline
//!
//! ```text
//! TileSource ──▶ codec::decode ──▶ TileIndexBuilder (+ Styler) ──▶ Arc<Tile>
//!     │                                                             │
//!  TileCache / TilePersistence                      Layer::query(bbox)
//!                                                                   ▼
//!                                   RasterBuffer ◀── LabelPlacer ◀─ draw
//!                                        │
//!                                        ▼
//!                                   frame() → String
//! ```
//!
//! # Example
//!
//! ```ignore
//! use mapscii::config::MapConfig;
//! use mapscii::source::TileSource;
//! use mapscii::style::StyleSheet;
//! use std::sync::Arc;
//!
//! let styler = Arc::new(StyleSheet::from_path("dark.json".as_ref())?);
//! let source = TileSource::open(&MapConfig::default(), styler)?;
//! let tile = source.get_tile(5, 17, 10).await?;
//! println!("{} nodes", tile.node_count());
//! ```

pub mod cache;
pub mod codec;
pub mod color;
pub mod config;
pub mod coord;
pub mod index;
pub mod label;
pub mod logging;
pub mod raster;
pub mod source;
pub mod style;
pub mod tile;

/// Version of the mapscii library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
