//! Best-effort on-disk persistence of raw tile payloads.

use super::path::tile_path;
use crate::coord::TileId;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Stores fetched tile payloads under a root directory.
///
/// Persistence never fails a tile load: when the root cannot be created the
/// store disables itself for the rest of the session, and individual read or
/// write errors are logged and skipped.
#[derive(Debug)]
pub struct TilePersistence {
    root: PathBuf,
    enabled: AtomicBool,
}

impl TilePersistence {
    /// Open (creating if needed) a persistence root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let enabled = match std::fs::create_dir_all(&root) {
            Ok(()) => {
                info!(root = %root.display(), "Tile persistence enabled");
                true
            }
            Err(e) => {
                warn!(
                    root = %root.display(),
                    error = %e,
                    "Cannot create tile cache directory, persistence disabled"
                );
                false
            }
        };

        Self {
            root,
            enabled: AtomicBool::new(enabled),
        }
    }

    /// A store that never reads or writes.
    pub fn disabled() -> Self {
        Self {
            root: PathBuf::new(),
            enabled: AtomicBool::new(false),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turn persistence off for the rest of the session.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a persisted payload; `None` when absent, disabled or unreadable.
    pub async fn read(&self, id: &TileId) -> Option<Vec<u8>> {
        if !self.is_enabled() {
            return None;
        }

        let path = tile_path(&self.root, id);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                debug!(tile = %id, bytes = data.len(), "Read persisted tile");
                Some(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read persisted tile");
                None
            }
        }
    }

    /// Persist a payload. Returns whether the write happened.
    pub async fn write(&self, id: &TileId, data: &[u8]) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let path = tile_path(&self.root, id);
        if let Some(parent) = path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!(path = %parent.display(), error = %e, "Failed to create tile directory");
                return false;
            }
        }

        match tokio::fs::write(&path, data).await {
            Ok(()) => {
                debug!(tile = %id, bytes = data.len(), "Persisted tile");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to persist tile");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let store = TilePersistence::new(temp.path().join("mapscii"));
        let id = TileId::new(5, 10, 12);

        assert!(store.is_enabled());
        assert_eq!(store.read(&id).await, None);
        assert!(store.write(&id, b"payload").await);
        assert_eq!(store.read(&id).await, Some(b"payload".to_vec()));
        assert!(temp.path().join("mapscii/5/10-12.pbf").exists());
    }

    #[tokio::test]
    async fn test_uncreatable_root_disables() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let store = TilePersistence::new(blocker.join("mapscii"));
        let id = TileId::new(1, 0, 0);
        assert!(!store.is_enabled());
        assert!(!store.write(&id, b"x").await);
        assert_eq!(store.read(&id).await, None);
    }

    #[tokio::test]
    async fn test_disabled_store() {
        let store = TilePersistence::disabled();
        assert!(!store.is_enabled());
        assert!(!store.write(&TileId::new(1, 0, 0), b"x").await);
    }

    #[tokio::test]
    async fn test_disable_at_runtime() {
        let temp = TempDir::new().unwrap();
        let store = TilePersistence::new(temp.path());
        let id = TileId::new(2, 1, 1);
        assert!(store.write(&id, b"x").await);

        store.disable();
        assert_eq!(store.read(&id).await, None);
    }
}
