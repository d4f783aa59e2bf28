//! Request Cache Module
//!
//! Key-addressed cache with TTL expiry plus coalescing of in-flight
//! operations: at most one operation per key runs at any moment and every
//! concurrent caller shares its outcome.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, trace, warn};

use crate::cache::{CacheEntry, CacheKey, CacheStats, RequestParams, DEFAULT_TTL};
use crate::config::Config;

/// Settles to `None` if the operation panicked.
type SharedOperation<T, E> = Shared<BoxFuture<'static, Option<Result<T, E>>>>;

// == Pending Operation ==
/// Registration of an operation that has been started and not yet settled.
struct PendingOperation<T, E> {
    /// Identifies this registration, so a stale settlement can tell it was cleared
    id: u64,
    handle: SharedOperation<T, E>,
}

// == Cache State ==
/// Both maps, guarded together by one mutex.
struct CacheState<T, E> {
    entries: HashMap<CacheKey, CacheEntry<T>>,
    pending: HashMap<CacheKey, PendingOperation<T, E>>,
    stats: CacheStats,
    next_id: u64,
}

impl<T: Clone, E> CacheState<T, E> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            pending: HashMap::new(),
            stats: CacheStats::new(),
            next_id: 0,
        }
    }

    fn lookup(&mut self, key: &CacheKey) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if entry.is_valid() => {
                trace!(
                    key = %key,
                    ttl_remaining_ms = entry.ttl_remaining().as_millis() as u64,
                    "Cache hit"
                );
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                trace!(key = %key, "Cache miss");
                self.stats.record_miss();
                None
            }
        }
    }

    /// Takes the registration `id` off `key`, returning false if it is gone.
    fn deregister(&mut self, key: &CacheKey, id: u64) -> bool {
        match self.pending.get(key) {
            Some(pending) if pending.id == id => {
                self.pending.remove(key);
                true
            }
            _ => false,
        }
    }

    fn settle(&mut self, key: &CacheKey, id: u64, outcome: &Result<T, E>, ttl: Duration) {
        let registered = self.deregister(key, id);

        if outcome.is_err() {
            self.stats.record_failure();
            debug!(key = %key, "Operation failed, nothing cached");
            return;
        }

        if !registered {
            debug!(key = %key, "Registration cleared before settlement, result not cached");
            return;
        }

        if let Ok(value) = outcome {
            self.entries
                .insert(key.clone(), CacheEntry::new(value.clone(), ttl));
            debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "Operation settled, result cached");
        }
    }
}

// == Request Cache ==
/// Request cache with in-flight deduplication.
///
/// `T` is the payload of one resource family and `E` the failure type of its
/// operations. Cloning the cache yields another handle onto the same state.
pub struct RequestCache<T, E> {
    state: Arc<Mutex<CacheState<T, E>>>,
    /// TTL applied when none is given and to results of `dedupe`
    default_ttl: Duration,
}

impl<T, E> Clone for RequestCache<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            default_ttl: self.default_ttl,
        }
    }
}

impl<T, E> std::fmt::Debug for RequestCache<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl<T, E> Default for RequestCache<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<T, E> RequestCache<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::new())),
            default_ttl,
        }
    }

    /// Creates an empty cache using the configured default TTL.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_ttl())
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Derives the key used for a resource and its parameters.
    pub fn key_of(&self, resource: &str, params: &RequestParams) -> CacheKey {
        CacheKey::new(resource, params)
    }

    // == Lookup ==
    /// Returns the stored payload if present and still valid.
    pub fn lookup(&self, resource: &str, params: &RequestParams) -> Option<T> {
        let key = CacheKey::new(resource, params);
        self.lock().lookup(&key)
    }

    // == Store ==
    /// Stores a payload, replacing any previous entry for the key.
    ///
    /// # Arguments
    /// * `ttl` - Optional TTL (uses the default TTL if None)
    pub fn store(&self, resource: &str, params: &RequestParams, payload: T, ttl: Option<Duration>) {
        let key = CacheKey::new(resource, params);
        let ttl = ttl.unwrap_or(self.default_ttl);
        trace!(key = %key, ttl_ms = ttl.as_millis() as u64, "Storing entry");
        self.lock().entries.insert(key, CacheEntry::new(payload, ttl));
    }

    // == Dedupe ==
    /// Returns a cached payload or runs `operation` once for all concurrent callers.
    ///
    /// 1. A valid entry is returned immediately.
    /// 2. If an operation for the key is in flight, its outcome is awaited.
    /// 3. Otherwise `operation` is started and registered. On success the
    ///    payload is stored with the default TTL; failures are never cached.
    ///    The registration is dropped either way once it settles.
    ///
    /// The operation is driven to completion on its own task, so callers
    /// dropping their await neither cancel it nor deregister it.
    ///
    /// # Panics
    /// Must be called within a tokio runtime. A panic inside `operation` is
    /// propagated to every caller after the registration is dropped.
    pub async fn dedupe<F, Fut>(
        &self,
        resource: &str,
        params: &RequestParams,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let key = CacheKey::new(resource, params);

        let handle = {
            let mut state = self.lock();

            if let Some(value) = state.lookup(&key) {
                return Ok(value);
            }

            if let Some(handle) = state.pending.get(&key).map(|p| p.handle.clone()) {
                state.stats.record_coalesced();
                debug!(key = %key, "Joining in-flight operation");
                handle
            } else {
                state.next_id += 1;
                let id = state.next_id;
                state.stats.record_operation();

                let handle = run_operation(
                    Arc::downgrade(&self.state),
                    key.clone(),
                    id,
                    self.default_ttl,
                    operation,
                )
                .boxed()
                .shared();

                state.pending.insert(
                    key.clone(),
                    PendingOperation {
                        id,
                        handle: handle.clone(),
                    },
                );
                tokio::spawn(handle.clone());
                debug!(key = %key, id, "Started operation");
                handle
            }
        };

        match handle.await {
            Some(outcome) => outcome,
            None => panic!("operation for {} panicked", key),
        }
    }

    // == Invalidate ==
    /// Removes the entry for a resource and its parameters, if present.
    ///
    /// An operation already in flight for the key is left alone and still
    /// stores its result when it settles.
    pub fn invalidate(&self, resource: &str, params: &RequestParams) {
        let key = CacheKey::new(resource, params);
        if self.lock().entries.remove(&key).is_some() {
            debug!(key = %key, "Invalidated entry");
        }
    }

    /// Removes every entry whose key contains `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|key, _| !key.contains(pattern));
        let removed = before - state.entries.len();
        debug!(pattern, removed, "Invalidated entries by pattern");
        removed
    }

    // == Clear ==
    /// Drops every entry and every pending registration.
    ///
    /// Operations already running still settle and deliver their outcome to
    /// their callers, but they no longer write into the cache.
    pub fn clear(&self) {
        let mut state = self.lock();
        let entries = state.entries.len();
        let pending = state.pending.len();
        state.entries.clear();
        state.pending.clear();
        info!(entries, pending, "Request cache cleared");
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.total_entries = state.entries.len();
        stats.pending = state.pending.len();
        stats
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Returns the number of operations currently registered as in flight.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<T, E>> {
        lock_state(&self.state)
    }
}

fn lock_state<T, E>(state: &Mutex<CacheState<T, E>>) -> MutexGuard<'_, CacheState<T, E>> {
    // The maps stay consistent even if a holder panicked mid-section
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs the operation and records its settlement against registration `id`.
///
/// A panic is caught so every waiter is still woken; they re-raise it.
async fn run_operation<T, E, F, Fut>(
    state: Weak<Mutex<CacheState<T, E>>>,
    key: CacheKey,
    id: u64,
    ttl: Duration,
    operation: F,
) -> Option<Result<T, E>>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let outcome = AssertUnwindSafe(async move { operation().await })
        .catch_unwind()
        .await
        .ok();

    let Some(state) = state.upgrade() else {
        trace!(key = %key, "Cache dropped before settlement");
        return outcome;
    };

    let mut state = lock_state(&state);
    match &outcome {
        Some(outcome) => state.settle(&key, id, outcome, ttl),
        None => {
            warn!(key = %key, "Operation panicked");
            state.deregister(&key, id);
        }
    }
    drop(state);

    outcome
}
