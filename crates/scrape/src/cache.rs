// ABOUTME: Generic in-memory memoization keyed by the serialized call arguments.
// ABOUTME: Backed by an LRU map with optional TTL and capacity; only successful results are stored.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::Serialize;
use tracing::debug;

/// Memo table mapping serialized arguments to previously computed values.
///
/// Keys are any `Serialize` value (typically a tuple of the call arguments)
/// rendered to JSON. With an entry limit the least recently used entry is
/// evicted first. The lock is never held across an await.
pub struct MemoCache<V> {
    // None when the entry limit is zero.
    entries: Option<Mutex<LruCache<String, CachedEntry<V>>>>,
    ttl: Option<Duration>,
}

struct CachedEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V: Clone> MemoCache<V> {
    /// Unbounded cache whose entries never expire.
    pub fn new() -> Self {
        Self::with_limits(None, None)
    }

    /// Cache with an optional time-to-live and an optional entry limit.
    pub fn with_limits(ttl: Option<Duration>, max_entries: Option<usize>) -> Self {
        let entries = match max_entries {
            None => Some(LruCache::unbounded()),
            Some(max) => NonZeroUsize::new(max).map(LruCache::new),
        };
        Self {
            entries: entries.map(Mutex::new),
            ttl,
        }
    }

    /// Serialize call arguments into a cache key.
    ///
    /// Returns None for arguments that cannot be serialized; such calls are
    /// simply not memoized.
    pub fn key_for<K: Serialize + ?Sized>(args: &K) -> Option<String> {
        serde_json::to_string(args).ok()
    }

    /// Look up a previous result for `args`, dropping it if it has expired.
    pub fn get<K: Serialize + ?Sized>(&self, args: &K) -> Option<V> {
        let key = Self::key_for(args)?;
        let mut entries = self.entries.as_ref()?.lock().ok()?;
        let expired = self.is_expired(entries.get(&key)?);
        if expired {
            entries.pop(&key);
            return None;
        }
        entries.get(&key).map(|entry| entry.value.clone())
    }

    /// Store `value` as the result for `args`.
    pub fn insert<K: Serialize + ?Sized>(&self, args: &K, value: V) {
        let Some(key) = Self::key_for(args) else {
            return;
        };
        let Some(Ok(mut entries)) = self.entries.as_ref().map(|e| e.lock()) else {
            return;
        };
        if let Some((evicted, _)) = entries.push(
            key.clone(),
            CachedEntry {
                value,
                inserted_at: Instant::now(),
            },
        ) {
            if evicted != key {
                debug!(key = %evicted, "memo cache evicted least recently used entry");
            }
        }
    }

    /// Return the cached value for `args`, or run `compute` and cache its `Ok` result.
    ///
    /// Errors are returned to the caller and never cached, so a later call
    /// with the same arguments runs `compute` again.
    pub async fn get_or_try_insert_with<K, F, Fut, E>(&self, args: &K, compute: F) -> Result<V, E>
    where
        K: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(args) {
            debug!("memo cache hit");
            return Ok(hit);
        }
        let value = compute().await?;
        self.insert(args, value.clone());
        Ok(value)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Some(Ok(mut entries)) = self.entries.as_ref().map(|e| e.lock()) {
            entries.clear();
        }
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        match self.entries.as_ref().map(|e| e.lock()) {
            Some(Ok(entries)) => entries.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &CachedEntry<V>) -> bool {
        self.ttl
            .map_or(false, |ttl| entry.inserted_at.elapsed() > ttl)
    }
}

impl<V: Clone> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
