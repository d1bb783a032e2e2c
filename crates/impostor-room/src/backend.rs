//! Typed access to the store: encode/decode, key scheme, TTL and
//! round-trip deadline in one place.

use std::future::Future;
use std::time::Duration;

use impostor_protocol::{Codec, Room, RoomToken};
use impostor_store::{RoomStore, StoreError, room_key};

use crate::RoomError;

pub(crate) struct Backend<S, C> {
    store: S,
    codec: C,
    ttl: Duration,
    timeout: Duration,
}

impl<S: RoomStore, C: Codec> Backend<S, C> {
    pub(crate) fn new(store: S, codec: C, ttl: Duration, timeout: Duration) -> Self {
        Self {
            store,
            codec,
            ttl,
            timeout,
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Runs one store round-trip under the configured deadline.
    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, RoomError> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "store round-trip timed out");
                Err(StoreError::Timeout(self.timeout).into())
            }
        }
    }

    pub(crate) async fn exists(&self, token: &RoomToken) -> Result<bool, RoomError> {
        self.bounded(self.store.exists(&room_key(token))).await
    }

    /// Reads and decodes a record along with its store version.
    pub(crate) async fn fetch(&self, token: &RoomToken) -> Result<Option<(Room, u64)>, RoomError> {
        let Some(stored) = self.bounded(self.store.get(&room_key(token))).await? else {
            return Ok(None);
        };
        let room: Room = self.codec.decode(&stored.value).map_err(|e| {
            tracing::error!(%token, error = %e, "undecodable room record");
            RoomError::from(e)
        })?;
        Ok(Some((room, stored.version)))
    }

    /// Like [`fetch`](Self::fetch) but absence is `NotFound`.
    pub(crate) async fn load(&self, token: &RoomToken) -> Result<(Room, u64), RoomError> {
        self.fetch(token)
            .await?
            .ok_or_else(|| RoomError::NotFound(token.clone()))
    }

    pub(crate) async fn insert_new(
        &self,
        token: &RoomToken,
        room: &Room,
    ) -> Result<bool, RoomError> {
        let value = self.codec.encode(room)?;
        self.bounded(self.store.set_if_absent(&room_key(token), value, self.ttl))
            .await
    }

    pub(crate) async fn overwrite(&self, token: &RoomToken, room: &Room) -> Result<(), RoomError> {
        let value = self.codec.encode(room)?;
        self.bounded(self.store.set(&room_key(token), value, self.ttl))
            .await
    }

    /// Compare-and-set against `version`. `false` means someone else
    /// wrote first.
    pub(crate) async fn swap(
        &self,
        token: &RoomToken,
        room: &Room,
        version: u64,
    ) -> Result<bool, RoomError> {
        let value = self.codec.encode(room)?;
        self.bounded(
            self.store
                .compare_and_set(&room_key(token), value, version, self.ttl),
        )
        .await
    }

    /// Pushes the record's expiry back to a full retention window.
    pub(crate) async fn touch(&self, token: &RoomToken) -> Result<bool, RoomError> {
        self.bounded(self.store.expire(&room_key(token), self.ttl))
            .await
    }
}
