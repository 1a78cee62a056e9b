//! Tile acquisition.
//!
//! [`TileSource`] maps `(z, x, y)` to a shared, fully built [`Tile`]:
//!
//! 1. memory cache hit → the cached `Arc` is returned, nothing else runs
//! 2. miss → the cache makes room (FIFO) for the coming insert
//! 3. raw payload from the archive backend (blocking pool) or from the
//!    persisted copy / HTTP server
//! 4. decode, style and index, then insert into the cache
//!
//! Concurrent requests for the same missing tile are not coalesced; each
//! loads independently and the last insert wins.

mod archive;
mod error;
mod http;

#[cfg(feature = "mbtiles")]
pub use archive::MbtilesBackend;
pub use archive::{ArchiveBackend, ArchiveError};
pub use error::TileSourceError;
pub use http::{AsyncHttpClient, AsyncReqwestClient, FetchError};

use crate::cache::{CacheStats, TileCache, TilePersistence};
use crate::codec;
use crate::config::MapConfig;
use crate::coord::TileId;
use crate::style::Styler;
use crate::tile::{Tile, TileIndexBuilder};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Where tiles come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Tile server; requests go to `{base_url}{z}/{x}/{y}.pbf`
    Http { base_url: String },
    /// Local MBTiles archive
    Archive { path: PathBuf },
}

impl SourceKind {
    /// Classify a source string.
    ///
    /// `http://`/`https://` prefixes select HTTP (a trailing `/` is added
    /// when missing); a `.mbtiles` suffix selects an archive.
    pub fn parse(source: &str) -> Result<Self, TileSourceError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let mut base_url = source.to_string();
            if !base_url.ends_with('/') {
                base_url.push('/');
            }
            Ok(SourceKind::Http { base_url })
        } else if source.ends_with(".mbtiles") {
            Ok(SourceKind::Archive {
                path: PathBuf::from(source),
            })
        } else {
            Err(TileSourceError::UnsupportedSource(source.to_string()))
        }
    }
}

/// Open the compiled-in archive backend for `path`.
///
/// Fails with [`TileSourceError::MissingBackend`] when no backend is
/// compiled in or the archive cannot be opened.
pub fn default_backend(path: &Path) -> Result<Arc<dyn ArchiveBackend>, TileSourceError> {
    #[cfg(feature = "mbtiles")]
    {
        match MbtilesBackend::open(path) {
            Ok(backend) => Ok(Arc::new(backend)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot open archive");
                Err(TileSourceError::MissingBackend(path.to_path_buf()))
            }
        }
    }

    #[cfg(not(feature = "mbtiles"))]
    {
        Err(TileSourceError::MissingBackend(path.to_path_buf()))
    }
}

/// Loads, builds and caches tiles.
pub struct TileSource<C = AsyncReqwestClient> {
    kind: SourceKind,
    client: C,
    archive: Option<Arc<dyn ArchiveBackend>>,
    builder: TileIndexBuilder,
    cache: TileCache,
    persistence: TilePersistence,
    stats: Mutex<CacheStats>,
}

impl TileSource<AsyncReqwestClient> {
    /// Build a source from configuration.
    ///
    /// # Errors
    ///
    /// * [`TileSourceError::UnsupportedSource`] - unrecognized source string
    /// * [`TileSourceError::MissingBackend`] - archive source without a usable backend
    /// * [`TileSourceError::HttpClient`] - the HTTP client could not be created
    ///   (HTTP sources only)
    pub fn open(config: &MapConfig, styler: Arc<dyn Styler>) -> Result<Self, TileSourceError> {
        let kind = SourceKind::parse(config.source())?;

        let (client, archive) = match &kind {
            SourceKind::Archive { path } => {
                (AsyncReqwestClient::disconnected(), Some(default_backend(path)?))
            }
            SourceKind::Http { .. } => {
                let client = AsyncReqwestClient::with_timeout(config.http_timeout_secs())
                    .map_err(TileSourceError::HttpClient)?;
                (client, None)
            }
        };

        let persistence = if config.persist_downloaded_tiles() {
            TilePersistence::new(config.cache_dir())
        } else {
            TilePersistence::disabled()
        };

        Self::new(
            config.source(),
            client,
            archive,
            TileIndexBuilder::new(styler, config.language()),
            TileCache::new(config.cache_size()),
            persistence,
        )
    }
}

impl<C: AsyncHttpClient> TileSource<C> {
    /// Assemble a source from its parts.
    ///
    /// # Arguments
    ///
    /// * `source` - `http(s)://` base URL or `.mbtiles` path
    /// * `client` - HTTP client used for HTTP sources
    /// * `archive` - Backend used for archive sources
    /// * `builder` - Tile builder (styler + language)
    /// * `cache` - Memory cache
    /// * `persistence` - On-disk store for fetched payloads
    pub fn new(
        source: &str,
        client: C,
        archive: Option<Arc<dyn ArchiveBackend>>,
        builder: TileIndexBuilder,
        cache: TileCache,
        persistence: TilePersistence,
    ) -> Result<Self, TileSourceError> {
        let kind = SourceKind::parse(source)?;
        if let SourceKind::Archive { path } = &kind {
            if archive.is_none() {
                return Err(TileSourceError::MissingBackend(path.clone()));
            }
        }

        info!(
            source = source,
            cache_size = cache.capacity(),
            persistence = persistence.is_enabled(),
            "Tile source ready"
        );

        Ok(Self {
            kind,
            client,
            archive,
            builder,
            cache,
            persistence,
            stats: Mutex::new(CacheStats::new()),
        })
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// URL of a tile for HTTP sources.
    pub fn tile_url(&self, id: &TileId) -> Option<String> {
        match &self.kind {
            SourceKind::Http { base_url } => {
                Some(format!("{}{}/{}/{}.pbf", base_url, id.z, id.x, id.y))
            }
            SourceKind::Archive { .. } => None,
        }
    }

    /// Get a built tile, loading it on a cache miss.
    pub async fn get_tile(&self, z: u8, x: u32, y: u32) -> Result<Arc<Tile>, TileSourceError> {
        let id = TileId::new(z, x, y);
        let key = id.to_string();

        if let Some(tile) = self.cache.get(&key) {
            trace!(tile = %id, "Memory cache hit");
            return Ok(tile);
        }

        let evicted = self.cache.make_room();
        if evicted > 0 {
            trace!(tile = %id, evicted = evicted, "Made room in memory cache");
        }

        let raw = self.load_raw(&id).await?;
        let decoded =
            codec::decode(&raw).map_err(|source| TileSourceError::Decode { tile: id, source })?;
        let tile = Arc::new(self.builder.build(id, decoded));

        self.cache.insert(key, Arc::clone(&tile));
        debug!(tile = %id, bytes = raw.len(), nodes = tile.node_count(), "Loaded tile");

        Ok(tile)
    }

    async fn load_raw(&self, id: &TileId) -> Result<Vec<u8>, TileSourceError> {
        match &self.kind {
            SourceKind::Archive { path } => {
                let backend = self
                    .archive
                    .clone()
                    .ok_or_else(|| TileSourceError::MissingBackend(path.clone()))?;
                let (z, x, y) = (id.z, id.x, id.y);

                let data = tokio::task::spawn_blocking(move || backend.read_tile(z, x, y))
                    .await
                    .map_err(|e| ArchiveError::Read(format!("archive task failed: {}", e)))
                    .and_then(|result| result)
                    .map_err(|source| TileSourceError::TileRead { tile: *id, source })?;

                self.stats.lock().record_archive_read();
                Ok(data)
            }
            SourceKind::Http { .. } => {
                if let Some(data) = self.persistence.read(id).await {
                    self.stats.lock().record_persisted_read();
                    return Ok(data);
                }

                let url = self.tile_url(id).unwrap_or_default();
                let data = match self.client.get(&url).await {
                    Ok(data) => data,
                    Err(source) => {
                        self.stats.lock().record_fetch_failure();
                        return Err(TileSourceError::Fetch { tile: *id, source });
                    }
                };
                self.stats.lock().record_fetch(data.len());

                if self.persistence.is_enabled() {
                    let written = self.persistence.write(id, &data).await;
                    let mut stats = self.stats.lock();
                    if written {
                        stats.record_persisted_write();
                    } else {
                        stats.record_persist_failure();
                    }
                }

                Ok(data)
            }
        }
    }

    /// Number of tiles in the memory cache.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Whether a tile is in the memory cache.
    pub fn contains(&self, id: &TileId) -> bool {
        self.cache.contains(&id.to_string())
    }

    pub fn persistence(&self) -> &TilePersistence {
        &self.persistence
    }

    /// Combined memory and backend counters.
    pub fn stats(&self) -> CacheStats {
        let memory = self.cache.stats();
        let mut stats = self.stats.lock().clone();
        stats.memory_hits = memory.memory_hits;
        stats.memory_misses = memory.memory_misses;
        stats.memory_evictions = memory.memory_evictions;
        stats.memory_entry_count = memory.memory_entry_count;
        stats
    }
}
