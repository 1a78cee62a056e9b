//! Map rendering configuration.

use super::defaults::*;
use crate::cache::default_cache_root;
use std::path::PathBuf;

/// Settings shared by the tile source, builder and raster buffer.
///
/// Built once and passed to constructors; nothing reads it globally.
///
/// # Example
///
/// ```
/// use mapscii::config::MapConfig;
///
/// let config = MapConfig::default();
/// assert_eq!(config.source(), "http://mapscii.me/");
/// assert_eq!(config.cache_size(), 16);
/// assert!(config.use_braille());
///
/// let config = MapConfig::new()
///     .with_source("/data/planet.mbtiles")
///     .with_language("de")
///     .with_persist_downloaded_tiles(false);
/// assert_eq!(config.language(), "de");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    /// Tile server base URL or `.mbtiles` path
    source: String,
    /// Maximum number of built tiles kept in memory
    cache_size: usize,
    /// Persist fetched HTTP tiles to disk
    persist_downloaded_tiles: bool,
    /// Persistence root override
    cache_dir: Option<PathBuf>,
    /// Preferred label language
    language: String,
    /// Braille output
    use_braille: bool,
    /// HTTP request timeout in seconds
    http_timeout_secs: u64,
    /// Label padding in cells
    label_margin: u32,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile source (`http(s)://` base URL or `*.mbtiles` path).
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the memory cache size in tiles. Default: 16.
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    pub fn with_persist_downloaded_tiles(mut self, persist: bool) -> Self {
        self.persist_downloaded_tiles = persist;
        self
    }

    /// Persist tiles under `dir` instead of the platform cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_braille(mut self, use_braille: bool) -> Self {
        self.use_braille = use_braille;
        self
    }

    pub fn with_http_timeout_secs(mut self, timeout: u64) -> Self {
        self.http_timeout_secs = timeout;
        self
    }

    pub fn with_label_margin(mut self, margin: u32) -> Self {
        self.label_margin = margin;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn cache_size(&self) -> usize {
        self.cache_size
    }

    pub fn persist_downloaded_tiles(&self) -> bool {
        self.persist_downloaded_tiles
    }

    /// Effective persistence root.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_root)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn use_braille(&self) -> bool {
        self.use_braille
    }

    pub fn http_timeout_secs(&self) -> u64 {
        self.http_timeout_secs
    }

    pub fn label_margin(&self) -> u32 {
        self.label_margin
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            cache_size: DEFAULT_CACHE_SIZE,
            persist_downloaded_tiles: DEFAULT_PERSIST_DOWNLOADED_TILES,
            cache_dir: None,
            language: DEFAULT_LANGUAGE.to_string(),
            use_braille: DEFAULT_USE_BRAILLE,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            label_margin: DEFAULT_LABEL_MARGIN,
        }
    }
}
