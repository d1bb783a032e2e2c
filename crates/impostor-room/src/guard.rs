//! Per-room serialization of read-modify-write cycles.
//!
//! Two joins arriving at the same time must never both read the same
//! roster and both append to it. The guard makes fetch → compute → store
//! behave as one step per token, while rooms with different tokens never
//! wait on each other.
//!
//! # Purity requirement
//!
//! Under [`GuardStrategy::Optimistic`] the compute closure can run more
//! than once for a single call. It must derive the next record from its
//! argument only and have no side effects beyond drawing randomness.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use impostor_protocol::{Codec, Room, RoomToken};
use impostor_store::{RoomStore, StoreError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::backend::Backend;
use crate::{GuardStrategy, RoomError};

/// What the compute closure wants done with its result.
#[derive(Debug)]
pub(crate) enum Step {
    /// Persist this record.
    Write(Room),
    /// Nothing changed; hand the record back without writing.
    Unchanged(Room),
}

/// Outcome of a guarded update.
#[derive(Debug)]
pub(crate) struct Applied {
    pub(crate) room: Room,
    pub(crate) written: bool,
}

// ---------------------------------------------------------------------------
// LockTable
// ---------------------------------------------------------------------------

/// One async mutex per room token, created on demand.
///
/// The table only holds `Weak` references. A token's mutex lives exactly
/// as long as some task holds or waits on it; dead entries are pruned on
/// the next acquisition, so the table never grows past the number of
/// rooms currently being mutated.
#[derive(Debug, Default)]
pub(crate) struct LockTable {
    locks: Mutex<HashMap<RoomToken, Weak<AsyncMutex<()>>>>,
}

impl LockTable {
    /// Waits for exclusive access to `token`'s record.
    pub(crate) async fn acquire(&self, token: &RoomToken) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, weak| weak.strong_count() > 0);
            match locks.get(token).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    let lock = Arc::new(AsyncMutex::new(()));
                    locks.insert(token.clone(), Arc::downgrade(&lock));
                    lock
                }
            }
        };
        lock.lock_owned().await
    }

    /// Number of tokens with a live mutex.
    pub(crate) fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

// ---------------------------------------------------------------------------
// ConcurrencyGuard
// ---------------------------------------------------------------------------

/// Serializes mutations per token using the configured strategy.
#[derive(Debug)]
pub struct ConcurrencyGuard {
    strategy: GuardStrategy,
    locks: LockTable,
}

impl ConcurrencyGuard {
    pub fn new(strategy: GuardStrategy) -> Self {
        Self {
            strategy,
            locks: LockTable::default(),
        }
    }

    pub fn strategy(&self) -> GuardStrategy {
        self.strategy
    }

    /// Number of rooms currently locked or being waited on. Always 0
    /// under the optimistic strategy.
    pub fn active_locks(&self) -> usize {
        self.locks.active()
    }

    /// Persists a brand-new record if the token is free.
    ///
    /// The existence check and the write are a single `set_if_absent`
    /// round-trip, so two creators can never both succeed.
    pub(crate) async fn create<S: RoomStore, C: Codec>(
        &self,
        backend: &Backend<S, C>,
        token: &RoomToken,
        room: &Room,
    ) -> Result<bool, RoomError> {
        match self.strategy {
            GuardStrategy::Lock => {
                let _held = self.locks.acquire(token).await;
                backend.insert_new(token, room).await
            }
            GuardStrategy::Optimistic { .. } => backend.insert_new(token, room).await,
        }
    }

    /// Applies `compute` to the current record of `token` as one atomic
    /// step.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] if there is no record.
    /// - Whatever `compute` returns; nothing is written in that case.
    /// - [`RoomError::StoreUnavailable`] on store failure or when the
    ///   optimistic retry budget runs out.
    pub(crate) async fn update<S, C, F>(
        &self,
        backend: &Backend<S, C>,
        token: &RoomToken,
        mut compute: F,
    ) -> Result<Applied, RoomError>
    where
        S: RoomStore,
        C: Codec,
        F: FnMut(Room) -> Result<Step, RoomError>,
    {
        match self.strategy {
            GuardStrategy::Lock => {
                let _held = self.locks.acquire(token).await;
                let (room, _) = backend.load(token).await?;
                match compute(room)? {
                    Step::Write(next) => {
                        backend.overwrite(token, &next).await?;
                        Ok(Applied {
                            room: next,
                            written: true,
                        })
                    }
                    Step::Unchanged(room) => Ok(Applied {
                        room,
                        written: false,
                    }),
                }
            }
            GuardStrategy::Optimistic { max_attempts } => {
                let max_attempts = max_attempts.max(1);
                for attempt in 1..=max_attempts {
                    let (room, version) = backend.load(token).await?;
                    match compute(room)? {
                        Step::Unchanged(room) => {
                            return Ok(Applied {
                                room,
                                written: false,
                            });
                        }
                        Step::Write(next) => {
                            if backend.swap(token, &next, version).await? {
                                return Ok(Applied {
                                    room: next,
                                    written: true,
                                });
                            }
                            tracing::debug!(%token, attempt, "write conflict, retrying");
                        }
                    }
                }
                tracing::warn!(%token, max_attempts, "optimistic retry budget exhausted");
                Err(StoreError::Unavailable(format!(
                    "room {token} still contended after {max_attempts} attempts"
                ))
                .into())
            }
        }
    }
}

impl Default for ConcurrencyGuard {
    fn default() -> Self {
        Self::new(GuardStrategy::default())
    }
}
