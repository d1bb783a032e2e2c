//! The room service: the operation surface callers use.
//!
//! A transport layer (HTTP routes, a CLI, a test) maps its requests onto
//! these five calls:
//!
//! | call            | result                | errors                                     |
//! |-----------------|-----------------------|--------------------------------------------|
//! | `create_room`   | normalized token      | InvalidInput, InvalidConfig, UnknownTheme, AlreadyExists |
//! | `check_room`    | exists?               | InvalidInput                               |
//! | `join_room`     | room record           | InvalidInput, NotFound, GameAlreadyStarted, RoomFull |
//! | `get_status`    | room record           | InvalidInput, NotFound                     |
//! | `reset_room`    | room record           | InvalidInput, NotFound, NotEnoughPlayers   |
//!
//! Any call can also fail with `StoreUnavailable`.
//!
//! The service is stateless apart from the guard's lock table: every
//! call goes to the store, so it can be wrapped in an `Arc` and shared by
//! any number of request tasks.

use std::time::{SystemTime, UNIX_EPOCH};

use impostor_protocol::{
    Codec, GameConfig, JsonCodec, PlayerId, PlayerName, Room, RoomToken, ThemeKey,
};
use impostor_store::RoomStore;

use crate::backend::Backend;
use crate::guard::Step;
use crate::machine::{self, Join};
use crate::{ConcurrencyGuard, RoomError, ServiceConfig, ThemeCatalog};

/// Create, join, poll and reset rooms on top of a [`RoomStore`].
///
/// Returned records are the true state: real roles and the real secret
/// word. Hiding the word from impostors is the caller's job.
pub struct RoomService<S, C = JsonCodec> {
    backend: Backend<S, C>,
    guard: ConcurrencyGuard,
    catalog: ThemeCatalog,
}

impl<S: RoomStore> RoomService<S> {
    /// A service with the built-in themes and the JSON record format.
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self::with_parts(store, JsonCodec, ThemeCatalog::default(), config)
    }
}

impl<S: RoomStore, C: Codec> RoomService<S, C> {
    /// A service with a custom codec and theme catalog.
    pub fn with_parts(store: S, codec: C, catalog: ThemeCatalog, config: ServiceConfig) -> Self {
        Self {
            backend: Backend::new(store, codec, config.retention, config.store_timeout),
            guard: ConcurrencyGuard::new(config.guard),
            catalog,
        }
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn guard(&self) -> &ConcurrencyGuard {
        &self.guard
    }

    pub fn store(&self) -> &S {
        self.backend.store()
    }

    /// Creates a room in the lobby under `token`.
    ///
    /// Everything is validated before the store is touched. Retrying a
    /// `create` whose outcome is unknown may come back as
    /// `AlreadyExists`, which then means the first attempt landed.
    pub async fn create_room(
        &self,
        token: &str,
        max_players: usize,
        impostors_count: usize,
        theme: &str,
    ) -> Result<RoomToken, RoomError> {
        let token = RoomToken::parse(token)?;
        let config = GameConfig {
            max_players,
            impostors_count,
            theme: ThemeKey::new(theme),
        };
        let room = machine::open(config, &self.catalog, &mut rand::rng(), now_millis())?;
        machine::check_invariants(&room, &self.catalog)?;

        if !self.guard.create(&self.backend, &token, &room).await? {
            tracing::debug!(%token, "create rejected, token in use");
            return Err(RoomError::AlreadyExists(token));
        }

        tracing::info!(
            %token,
            max_players,
            impostors = impostors_count,
            %theme,
            "room created"
        );
        Ok(token)
    }

    /// Returns `true` if a live room exists under `token`.
    pub async fn check_room(&self, token: &str) -> Result<bool, RoomError> {
        let token = RoomToken::parse(token)?;
        self.backend.exists(&token).await
    }

    /// Adds a player to a room, dealing the round when the roster fills.
    ///
    /// Joining again with an id already on the roster returns the current
    /// record and refreshes the room's retention window; it never fails
    /// because the game has started. That makes `join_room` safe to retry.
    pub async fn join_room(
        &self,
        token: &str,
        player_id: &str,
        name: &str,
    ) -> Result<Room, RoomError> {
        let token = RoomToken::parse(token)?;
        let player_id = PlayerId::parse(player_id)?;
        let name = PlayerName::parse(name)?;

        let applied = self
            .guard
            .update(&self.backend, &token, |room| {
                match machine::join(room, &player_id, &name, &self.catalog, &mut rand::rng())? {
                    Join::Rejoined(room) => Ok(Step::Unchanged(room)),
                    change => {
                        let next = change.into_room();
                        machine::check_invariants(&next, &self.catalog)?;
                        Ok(Step::Write(next))
                    }
                }
            })
            .await
            .inspect_err(|e| tracing::debug!(%token, %player_id, error = %e, "join refused"))?;

        let room = applied.room;
        if !applied.written {
            tracing::debug!(%token, %player_id, "player already on roster");
            self.backend.touch(&token).await?;
        } else if room.status.is_joinable() {
            tracing::info!(
                %token,
                %player_id,
                players = room.players.len(),
                max_players = room.config.max_players,
                "player joined"
            );
        } else {
            tracing::info!(
                %token,
                %player_id,
                players = room.players.len(),
                impostors = room.config.impostors_count,
                "roster full, round started"
            );
        }
        Ok(room)
    }

    /// Reads the current record. Not serialized against writers; a poll
    /// may see a record that is one write behind.
    pub async fn get_status(&self, token: &str) -> Result<Room, RoomError> {
        let token = RoomToken::parse(token)?;
        let (room, _) = self.backend.load(&token).await?;
        Ok(room)
    }

    /// Deals a new round over the existing roster and forces `playing`.
    ///
    /// Any caller may reset a room. The first player is shown as admin by
    /// clients, but the core does not enforce it.
    pub async fn reset_room(&self, token: &str) -> Result<Room, RoomError> {
        let token = RoomToken::parse(token)?;

        let applied = self
            .guard
            .update(&self.backend, &token, |room| {
                let next = machine::reset(room, &self.catalog, &mut rand::rng())?;
                machine::check_invariants(&next, &self.catalog)?;
                Ok(Step::Write(next))
            })
            .await?;

        tracing::info!(
            %token,
            players = applied.room.players.len(),
            "room reset, new round dealt"
        );
        Ok(applied.room)
    }
}

/// Milliseconds since the Unix epoch, for `created_at`.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
