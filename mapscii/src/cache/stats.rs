//! Tile cache statistics.

/// Counters describing how tiles were served.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    // Memory cache
    pub memory_hits: u64,
    pub memory_misses: u64,
    pub memory_evictions: u64,
    pub memory_entry_count: usize,

    // Persisted tiles
    pub persisted_reads: u64,
    pub persisted_writes: u64,
    pub persist_failures: u64,

    // Backends
    pub fetches: u64,
    pub fetch_failures: u64,
    pub bytes_fetched: u64,
    pub archive_reads: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory hit rate (0.0 to 1.0).
    pub fn memory_hit_rate(&self) -> f64 {
        let total = self.memory_hits + self.memory_misses;
        if total == 0 {
            0.0
        } else {
            self.memory_hits as f64 / total as f64
        }
    }

    pub fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    pub fn record_memory_miss(&mut self) {
        self.memory_misses += 1;
    }

    pub fn record_memory_eviction(&mut self, count: u64) {
        self.memory_evictions += count;
    }

    pub fn record_persisted_read(&mut self) {
        self.persisted_reads += 1;
    }

    pub fn record_persisted_write(&mut self) {
        self.persisted_writes += 1;
    }

    pub fn record_persist_failure(&mut self) {
        self.persist_failures += 1;
    }

    /// Record a successful HTTP fetch of `bytes` bytes.
    pub fn record_fetch(&mut self, bytes: usize) {
        self.fetches += 1;
        self.bytes_fetched += bytes as u64;
    }

    pub fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    pub fn record_archive_read(&mut self) {
        self.archive_reads += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_empty() {
        assert_eq!(CacheStats::new().memory_hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::new();
        stats.record_memory_hit();
        stats.record_memory_hit();
        stats.record_memory_hit();
        stats.record_memory_miss();
        assert!((stats.memory_hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fetch_counters() {
        let mut stats = CacheStats::new();
        stats.record_fetch(100);
        stats.record_fetch(50);
        stats.record_fetch_failure();
        assert_eq!(stats.fetches, 2);
        assert_eq!(stats.bytes_fetched, 150);
        assert_eq!(stats.fetch_failures, 1);
    }
}
