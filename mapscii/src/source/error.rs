//! Tile source errors.

use super::{ArchiveError, FetchError};
use crate::codec::CodecError;
use crate::coord::TileId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from resolving or loading tiles.
#[derive(Debug, Error)]
pub enum TileSourceError {
    /// The source string is neither an HTTP(S) URL nor an `.mbtiles` path
    #[error("Unsupported tile source '{0}': expected http(s):// URL or .mbtiles file")]
    UnsupportedSource(String),

    /// Archive sources need a backend that is not available
    #[error("No archive backend available for {0}")]
    MissingBackend(PathBuf),

    /// The HTTP client could not be created
    #[error("HTTP client unavailable: {0}")]
    HttpClient(#[source] FetchError),

    /// The archive backend failed to produce the tile
    #[error("Failed to read tile {tile}: {source}")]
    TileRead {
        tile: TileId,
        #[source]
        source: ArchiveError,
    },

    /// The HTTP fetch failed
    #[error("Failed to fetch tile {tile}: {source}")]
    Fetch {
        tile: TileId,
        #[source]
        source: FetchError,
    },

    /// The payload could not be decoded
    #[error("Failed to decode tile {tile}: {source}")]
    Decode {
        tile: TileId,
        #[source]
        source: CodecError,
    },
}
