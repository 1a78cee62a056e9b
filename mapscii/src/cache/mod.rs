//! Tile caching.
//!
//! Two independent stores sit in front of the tile backends:
//!
//! ```text
//! get_tile(z, x, y)
//!     │
//!     ▼
//! TileCache (memory, FIFO, Arc<Tile>) ──hit──▶ return
//!     │ miss
//!     ▼
//! TilePersistence (<cache>/mapscii/<z>/<x>-<y>.pbf, raw payload) ──hit──▶ decode + build
//!     │ miss
//!     ▼
//! backend fetch ──▶ persist (best effort) ──▶ decode + build
//! ```

mod memory;
mod path;
mod persist;
mod stats;

pub use memory::TileCache;
pub use path::{default_cache_root, tile_path, CACHE_DIR_NAME};
pub use persist::TilePersistence;
pub use stats::CacheStats;
