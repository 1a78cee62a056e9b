//! Bounded in-memory tile cache with FIFO eviction.

use super::CacheStats;
use crate::tile::Tile;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::trace;

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Arc<Tile>>,
    /// Keys in insertion order; each key appears at most once
    order: VecDeque<String>,
    stats: CacheStats,
}

impl CacheState {
    /// Evict oldest entries until at most `keep` remain.
    fn evict_to(&mut self, keep: usize) -> usize {
        let mut evicted = 0;
        while self.entries.len() > keep {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            trace!(key = %oldest, "Evicted tile");
            evicted += 1;
        }
        self.stats.record_memory_eviction(evicted as u64);
        evicted
    }
}

/// In-memory cache of built tiles keyed by `z-x-y`.
///
/// Eviction is strictly first-in first-out: hits do not refresh an entry's
/// position. All operations take a short synchronous lock.
pub struct TileCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl TileCache {
    /// Create a cache holding at most `capacity` tiles.
    ///
    /// A zero capacity caches nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Look up a tile, recording a hit or miss.
    pub fn get(&self, key: &str) -> Option<Arc<Tile>> {
        let mut state = self.state.lock();
        match state.entries.get(key).cloned() {
            Some(tile) => {
                state.stats.record_memory_hit();
                Some(tile)
            }
            None => {
                state.stats.record_memory_miss();
                None
            }
        }
    }

    /// Evict so that one more insert stays within capacity.
    ///
    /// Returns the number of evicted entries.
    pub fn make_room(&self) -> usize {
        self.state.lock().evict_to(self.capacity.saturating_sub(1))
    }

    /// Insert a tile.
    ///
    /// Re-inserting an existing key replaces the tile but keeps its original
    /// queue position.
    pub fn insert(&self, key: String, tile: Arc<Tile>) {
        if self.capacity == 0 {
            return;
        }

        let mut state = self.state.lock();
        if let Some(existing) = state.entries.get_mut(&key) {
            *existing = tile;
            return;
        }

        state.evict_to(self.capacity - 1);
        state.order.push_back(key.clone());
        state.entries.insert(key, tile);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    /// Cached keys, oldest first.
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().order.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
    }

    /// Snapshot of the memory counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.memory_entry_count = state.entries.len();
        stats
    }
}
