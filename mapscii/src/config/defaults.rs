//! Default configuration values.

/// Tile server used when no source is configured.
pub const DEFAULT_SOURCE: &str = "http://mapscii.me/";

/// Number of built tiles kept in memory.
pub const DEFAULT_CACHE_SIZE: usize = 16;

/// Whether fetched tiles are persisted to disk.
pub const DEFAULT_PERSIST_DOWNLOADED_TILES: bool = true;

/// Preferred label language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Braille glyphs (true) or the block-character fallback (false).
pub const DEFAULT_USE_BRAILLE: bool = true;

/// HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Label padding in character cells.
pub const DEFAULT_LABEL_MARGIN: u32 = crate::label::DEFAULT_LABEL_MARGIN;
