//! Cache Module
//!
//! Provides the request cache: TTL-bound entries plus deduplication of
//! in-flight operations.

use std::time::Duration;

mod entry;
mod key;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use key::{CacheKey, RequestParams};
pub use stats::CacheStats;
pub use store::RequestCache;

// == Public Constants ==
/// TTL used when the caller gives none
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);
