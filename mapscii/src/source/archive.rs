//! Local tile archives.
//!
//! Archive backends are synchronous; the tile source calls them on tokio's
//! blocking pool.

use crate::coord::TileId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an archive backend.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive could not be opened
    #[error("Failed to open archive {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// The archive holds no tile at the requested position
    #[error("Tile {tile} not found in archive")]
    NotFound { tile: TileId },

    /// Reading from the archive failed
    #[error("Archive read failed: {0}")]
    Read(String),
}

/// A local store of raw tile payloads addressed in XYZ coordinates.
pub trait ArchiveBackend: Send + Sync {
    fn read_tile(&self, z: u8, x: u32, y: u32) -> Result<Vec<u8>, ArchiveError>;
}

#[cfg(feature = "mbtiles")]
pub use mbtiles::MbtilesBackend;

#[cfg(feature = "mbtiles")]
mod mbtiles {
    use super::{ArchiveBackend, ArchiveError};
    use crate::coord::TileId;
    use parking_lot::Mutex;
    use rusqlite::{Connection, OpenFlags, OptionalExtension};
    use std::path::{Path, PathBuf};
    use tracing::{debug, info};

    const TILE_QUERY: &str = "SELECT tile_data FROM tiles \
         WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3";

    /// MBTiles (SQLite) archive reader.
    ///
    /// MBTiles stores rows in the TMS scheme; requests are flipped from XYZ
    /// before querying.
    pub struct MbtilesBackend {
        path: PathBuf,
        connection: Mutex<Connection>,
    }

    impl MbtilesBackend {
        /// Open an archive read-only.
        pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
            let path = path.as_ref().to_path_buf();
            let connection = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
                .map_err(|e| ArchiveError::Open {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

            info!(path = %path.display(), "Opened MBTiles archive");
            Ok(Self {
                path,
                connection: Mutex::new(connection),
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl ArchiveBackend for MbtilesBackend {
        fn read_tile(&self, z: u8, x: u32, y: u32) -> Result<Vec<u8>, ArchiveError> {
            let tile = TileId::new(z, x, y);
            let row = tile.tms_y();

            let data: Option<Vec<u8>> = self
                .connection
                .lock()
                .query_row(TILE_QUERY, rusqlite::params![z, x, row], |r| r.get(0))
                .optional()
                .map_err(|e| ArchiveError::Read(e.to_string()))?;

            match data {
                Some(data) => {
                    debug!(tile = %tile, tms_row = row, bytes = data.len(), "Read archive tile");
                    Ok(data)
                }
                None => Err(ArchiveError::NotFound { tile }),
            }
        }
    }

    impl std::fmt::Debug for MbtilesBackend {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MbtilesBackend")
                .field("path", &self.path)
                .finish()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::TempDir;

        fn create_archive(dir: &TempDir, tiles: &[(u8, u32, u32, &[u8])]) -> PathBuf {
            let path = dir.path().join("test.mbtiles");
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, \
                 tile_row INTEGER, tile_data BLOB);",
            )
            .unwrap();
            for (z, x, tms_row, data) in tiles {
                conn.execute(
                    "INSERT INTO tiles VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![z, x, tms_row, data],
                )
                .unwrap();
            }
            path
        }

        #[test]
        fn test_reads_flipped_row() {
            let dir = TempDir::new().unwrap();
            // z=3 has 8 rows: XYZ y=1 is TMS row 6
            let path = create_archive(&dir, &[(3, 2, 6, b"tile-3-2-1")]);
            let backend = MbtilesBackend::open(&path).unwrap();

            assert_eq!(backend.read_tile(3, 2, 1).unwrap(), b"tile-3-2-1");
            assert_eq!(backend.path(), path.as_path());
        }

        #[test]
        fn test_missing_tile() {
            let dir = TempDir::new().unwrap();
            let path = create_archive(&dir, &[(3, 2, 6, b"x")]);
            let backend = MbtilesBackend::open(&path).unwrap();

            assert!(matches!(
                backend.read_tile(3, 2, 6),
                Err(ArchiveError::NotFound { tile }) if tile == TileId::new(3, 2, 6)
            ));
        }

        #[test]
        fn test_open_missing_file() {
            let dir = TempDir::new().unwrap();
            let result = MbtilesBackend::open(dir.path().join("absent.mbtiles"));
            assert!(matches!(result, Err(ArchiveError::Open { .. })));
        }

        #[test]
        fn test_missing_table_is_read_error() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("empty.mbtiles");
            Connection::open(&path)
                .unwrap()
                .execute_batch("CREATE TABLE metadata (name TEXT, value TEXT);")
                .unwrap();

            let backend = MbtilesBackend::open(&path).unwrap();
            assert!(matches!(backend.read_tile(0, 0, 0), Err(ArchiveError::Read(_))));
        }
    }
}
