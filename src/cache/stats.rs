//! Cache Statistics Module
//!
//! Tracks lookups, coalesced joins and operation outcomes.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache activity counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a valid entry
    pub hits: u64,
    /// Lookups that found no valid entry
    pub misses: u64,
    /// Callers attached to an operation already in flight
    pub coalesced: u64,
    /// Operations started
    pub operations: u64,
    /// Operations that settled with a failure
    pub failures: u64,
    /// Current number of stored entries (valid or not)
    pub total_entries: usize,
    /// Current number of operations in flight
    pub pending: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Coalesced ==
    /// Increments the counter of callers that joined an in-flight operation.
    pub fn record_coalesced(&mut self) {
        self.coalesced += 1;
    }

    // == Record Operation ==
    /// Increments the counter of operations started.
    pub fn record_operation(&mut self) {
        self.operations += 1;
    }

    // == Record Failure ==
    /// Increments the counter of operations that settled with a failure.
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.coalesced, 0);
        assert_eq!(stats.operations, 0);
        assert_eq!(stats.failures, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_operation_counters() {
        let mut stats = CacheStats::new();
        stats.record_operation();
        stats.record_operation();
        stats.record_failure();
        stats.record_coalesced();
        assert_eq!(stats.operations, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.coalesced, 1);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["pending"], 0);
    }
}
