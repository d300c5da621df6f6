//! TTL-keyed response store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::http::response::Response;
use crate::resilience::clock::Clock;

/// A cached response and the instant it stops being valid.
///
/// `None` means the TTL reaches past the last representable instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<Response>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A thread-safe cache of successful responses keyed by canonical URI.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Get a response if present and not yet expired.
    ///
    /// Expired entries are removed on the way out.
    pub fn get(&self, key: &str) -> Option<Arc<Response>> {
        let now = self.clock.now();
        // The shard guard must be released before `remove_if` takes it again.
        let hit = self.entries.get(key).map(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                Some(entry.value.clone())
            }
        })?;

        if hit.is_none() {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        hit
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, value: Arc<Response>, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: self.clock.now().checked_add(ttl),
        };
        self.entries.insert(key.into(), entry);
    }

    /// Number of stored entries, expired ones included until next read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
