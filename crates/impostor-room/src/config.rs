//! Service configuration and room-setting validation.

use std::time::Duration;

use impostor_protocol::{GameConfig, MAX_PLAYERS, MIN_PLAYERS};
use impostor_store::ROOM_TTL;
use serde::{Deserialize, Serialize};

use crate::{RoomError, ThemeCatalog};

// ---------------------------------------------------------------------------
// GuardStrategy
// ---------------------------------------------------------------------------

/// How concurrent mutations of the same room are serialized.
///
/// ```text
/// Lock:        acquire(token) → get → compute → set → release
/// Optimistic:  get(v) → compute → compare_and_set(v) ─┬─ ok → done
///                 ↑                                   │
///                 └──────── conflict (≤ max) ─────────┘
/// ```
///
/// - **Lock**: one in-process mutex per token. Right for a single service
///   instance in front of the store; waiters queue instead of retrying.
/// - **Optimistic**: no in-process state; conflicts are detected by the
///   store's version check. Works across several service instances
///   sharing one store, at the cost of retries under contention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardStrategy {
    Lock,
    Optimistic {
        /// Total attempts (first try included) before giving up with
        /// `StoreUnavailable`.
        max_attempts: u32,
    },
}

impl GuardStrategy {
    /// Retry budget used by [`GuardStrategy::optimistic`].
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    /// Compare-and-set with the default retry budget.
    pub fn optimistic() -> Self {
        Self::Optimistic {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Default for GuardStrategy {
    fn default() -> Self {
        Self::Lock
    }
}

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`RoomService`](crate::RoomService).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// TTL applied to a room record on every write.
    pub retention: Duration,

    /// Upper bound on a single store round-trip. A call that exceeds it
    /// fails with `StoreUnavailable`.
    pub store_timeout: Duration,

    /// How mutations of one room are serialized.
    pub guard: GuardStrategy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            retention: ROOM_TTL,
            store_timeout: Duration::from_secs(2),
            guard: GuardStrategy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Room settings
// ---------------------------------------------------------------------------

/// Checks room settings before anything is written.
///
/// - `max_players` within `MIN_PLAYERS..=MAX_PLAYERS`
/// - `impostors_count` within `1..=max_players / 2`
/// - `theme` known to the catalog
pub fn validate_game_config(config: &GameConfig, catalog: &ThemeCatalog) -> Result<(), RoomError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&config.max_players) {
        return Err(RoomError::InvalidConfig(format!(
            "max players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
            config.max_players
        )));
    }
    let max_impostors = config.max_players / 2;
    if config.impostors_count < 1 || config.impostors_count > max_impostors {
        return Err(RoomError::InvalidConfig(format!(
            "impostors must be between 1 and {max_impostors} for {} players, got {}",
            config.max_players, config.impostors_count
        )));
    }
    catalog.words_for(&config.theme)?;
    Ok(())
}
