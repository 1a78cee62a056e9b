//! Persisted tile layout.

use crate::coord::TileId;
use std::path::{Path, PathBuf};

/// Directory name created under the platform cache directory.
pub const CACHE_DIR_NAME: &str = "mapscii";

/// Default persistence root: `<platform cache dir>/mapscii`.
///
/// Falls back to the working directory when the platform has no cache
/// directory.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
}

/// Path of a persisted tile: `<root>/<z>/<x>-<y>.pbf`.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use mapscii::cache::tile_path;
/// use mapscii::coord::TileId;
///
/// let path = tile_path(&PathBuf::from("/cache/mapscii"), &TileId::new(5, 10, 12));
/// assert_eq!(path, PathBuf::from("/cache/mapscii/5/10-12.pbf"));
/// ```
pub fn tile_path(root: &Path, id: &TileId) -> PathBuf {
    root.join(id.z.to_string())
        .join(format!("{}-{}.pbf", id.x, id.y))
}
