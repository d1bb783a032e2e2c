//! The store collaborator contract.
//!
//! Impostor doesn't ship a production database. Any key-value service
//! with per-key expiry and some form of conditional write (Redis, a
//! managed KV, a SQL table with a version column) can back a room
//! service, as long as it implements [`RoomStore`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use impostor_protocol::RoomToken;

use crate::StoreError;

/// Prefix shared by every room key.
pub const KEY_PREFIX: &str = "room:";

/// How long an untouched room record survives: 24 hours.
pub const ROOM_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Builds the storage key for a room: `room:<TOKEN>`.
pub fn room_key(token: &RoomToken) -> String {
    format!("{KEY_PREFIX}{token}")
}

/// A stored value together with the version it was written at.
///
/// Versions change on every write to the key, so a reader can later ask
/// the store to "write this only if nobody else wrote in between" with
/// [`RoomStore::compare_and_set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    pub value: Vec<u8>,
    pub version: u64,
}

/// Key-value storage for serialized room records.
///
/// Every write carries a TTL, which replaces whatever expiry the key had.
/// A key whose TTL has elapsed behaves exactly like a missing key.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` because one store is shared by every request
/// task, and the returned futures are `Send` so those tasks can run on
/// any worker thread.
pub trait RoomStore: Send + Sync + 'static {
    /// Returns `true` if a live record exists under `key`.
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Fetches the record under `key` with its current version.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Versioned>, StoreError>> + Send;

    /// Writes `value` only if no live record exists under `key`.
    ///
    /// Returns `true` if the record was created, `false` if one was
    /// already present (which is left untouched).
    fn set_if_absent(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Unconditionally replaces the record under `key`.
    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replaces the record under `key` only if its current version is
    /// `expected`.
    ///
    /// Returns `false` (and writes nothing) if the key is missing or was
    /// written since `expected` was read.
    fn compare_and_set(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: u64,
        ttl: Duration,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Resets the TTL of a live record without touching its value or
    /// version. Returns `false` if the key is missing.
    fn expire(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// A shared store is still a store, so a test can keep one handle for
/// inspection while the service owns another.
impl<T: RoomStore> RoomStore for Arc<T> {
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).exists(key)
    }

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Versioned>, StoreError>> + Send {
        (**self).get(key)
    }

    fn set_if_absent(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).set_if_absent(key, value, ttl)
    }

    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).set(key, value, ttl)
    }

    fn compare_and_set(
        &self,
        key: &str,
        value: Vec<u8>,
        expected: u64,
        ttl: Duration,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).compare_and_set(key, value, expected, ttl)
    }

    fn expire(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).expire(key, ttl)
    }
}
