//! In-process [`RoomStore`] implementation.
//!
//! `MemoryStore` keeps every record in a `HashMap` behind a mutex, with an
//! expiry instant per key. It is what the tests and the demo run against,
//! and it doubles as the executable definition of the store contract.
//!
//! # Time
//!
//! Expiry uses `tokio::time::Instant`, not `std::time::Instant`. Under a
//! paused tokio clock (`tokio::time::pause()`) tests can jump a whole day
//! forward with `tokio::time::advance` instead of sleeping.
//!
//! # Expiry
//!
//! Expired entries are treated as absent the moment their deadline
//! passes. They are physically removed either when a write lands on the
//! same key or when [`MemoryStore::purge_expired`] sweeps the map.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::{RoomStore, StoreError, Versioned};

/// One stored record.
#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    version: u64,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// Last version handed out. Store-wide, so a key that expires and is
    /// recreated never reuses a version a stale reader might still hold.
    last_version: u64,
}

impl Inner {
    fn live(&self, key: &str, now: Instant) -> Option<&Entry> {
        self.entries.get(key).filter(|e| e.is_live(now))
    }

    fn write(&mut self, key: &str, value: Vec<u8>, now: Instant, ttl: Duration) -> u64 {
        self.last_version += 1;
        let version = self.last_version;
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                version,
                expires_at: now + ttl,
            },
        );
        version
    }
}

/// A thread-safe, TTL-aware key-value store living in process memory.
///
/// The mutex is only ever held for the duration of a single map
/// operation, never across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave a half-written
        // entry behind (every mutation is a single insert/remove), so a
        // poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes every expired entry and returns their keys.
    ///
    /// Reads already ignore expired entries; this only reclaims memory.
    pub fn purge_expired(&self) -> Vec<String> {
        let now = Instant::now();
        let mut inner = self.lock();
        let mut purged = Vec::new();
        inner.entries.retain(|key, entry| {
            if entry.is_live(now) {
                true
            } else {
                purged.push(key.clone());
                false
            }
        });
        if !purged.is_empty() {
            tracing::debug!(count = purged.len(), "purged expired room records");
        }
        purged
    }

    /// Time left before `key` expires, or `None` if it is absent.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.lock()
            .live(key, now)
            .map(|e| e.expires_at.saturating_duration_since(now))
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().entries.values().filter(|e| e.is_live(now)).count()
    }

    /// Returns `true` if there are no live records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RoomStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.lock().live(key, Instant::now()).is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<Versioned>, StoreError> {
        Ok(self.lock().live(key, Instant::now()).map(|e| Versioned {
            value: e.value.clone(),
            version: e.version,
        }))
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut inner = self.lock();
        if inner.live(key, now).is_some() {
            return Ok(false);
        }
        inner.write(key, value, now, ttl);
        Ok(true)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        self.lock().write(key, value, Instant::now(), ttl);
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: u64,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut inner = self.lock();
        if inner.live(key, now).map(|e| e.version) != Some(expected) {
            return Ok(false);
        }
        inner.write(key, value, now, ttl);
        Ok(true)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut inner = self.lock();
        match inner.entries.get_mut(key) {
            Some(entry) if entry.is_live(now) => {
                entry.expires_at = now + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
