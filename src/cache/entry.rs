//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored payload together with the moment it was stored and its TTL.
///
/// Entries are never updated in place; storing again under the same key
/// replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored payload
    pub value: T,
    /// When the payload was stored
    pub stored_at: Instant,
    /// How long the payload stays valid
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stored now.
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    // == Is Valid ==
    /// Checks if the entry is still valid at `now`.
    ///
    /// Valid while strictly less than `ttl` has elapsed since it was stored.
    /// A zero TTL is never valid.
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining validity window, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl
            .saturating_sub(Instant::now().saturating_duration_since(self.stored_at))
    }
}
