//! In-memory response cache with per-entry expiry.
//!
//! Entries are keyed by string and expire a fixed time after they were
//! stored. Expired entries are evicted lazily when read, or in bulk through
//! [`TtlCache::purge_expired`].
//!
//! Time comes from a [`Clock`] so expiry can be tested without sleeping.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use markhub_github::TtlCache;
//!
//! let cache = TtlCache::new();
//! cache.set("repos", vec!["acme/docs"], Duration::from_secs(300));
//!
//! assert_eq!(cache.get("repos"), Some(vec!["acme/docs"]));
//! assert_eq!(cache.get("files:acme/docs"), None);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock stopped at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        let delta = TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
        *now = now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    /// Sets the clock to `to`.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// A thread-safe key/value cache whose entries expire.
///
/// An entry is visible while the clock reads strictly before its expiry.
/// Storing under an existing key replaces the value and restarts its TTL.
pub struct TtlCache<V, C = SystemClock> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    clock: C,
}

impl<V: Clone> TtlCache<V, SystemClock> {
    /// Creates an empty cache on the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V: Clone> Default for TtlCache<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, C: Clock> TtlCache<V, C> {
    /// Creates an empty cache reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Returns a copy of the value under `key`, if present and unexpired.
    ///
    /// An expired entry is removed.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            debug!(key, "evicting expired cache entry");
            entries.remove(key);
        }
        None
    }

    /// Stores `value` under `key` for `ttl`.
    ///
    /// A TTL too large to represent never expires.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = self.clock.now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.lock().insert(key.into(), Entry { value, expires_at });
    }

    /// Removes `key`, returning its value if it was present and unexpired.
    pub fn remove(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        self.lock()
            .remove(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value)
    }

    /// Drops every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "purged expired cache entries");
        }
        purged
    }

    /// Number of stored entries, expired ones included until evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V, C> fmt::Debug for TtlCache<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .entries
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().len(), |entries| entries.len());
        f.debug_struct("TtlCache").field("entries", &len).finish_non_exhaustive()
    }
}
