//! Pure room transitions.
//!
//! Every function here takes a room record (or the settings for a new
//! one) and returns the next record. Nothing touches the store, so the
//! guard can call these as many times as it needs to while retrying.
//!
//! ```text
//!            join (roster not full)
//!            ┌────┐
//!            ▼    │
//! open ──→ Lobby ─┴─ join (roster fills) ──→ Playing ──┐
//!            │                                  ▲      │ reset
//!            └───────────── reset ──────────────┘ ◄────┘
//! ```

use impostor_protocol::{GameConfig, Player, PlayerId, PlayerName, Role, Room, RoomStatus};
use rand::Rng;

use crate::config::validate_game_config;
use crate::roles::{assign_roles, turn_order};
use crate::{RoomError, ThemeCatalog};

/// Result of a successful [`join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Join {
    /// The player was already on the roster; the record is unchanged.
    Rejoined(Room),
    /// The player was appended; the room is still in the lobby.
    Admitted(Room),
    /// The player was appended, filling the roster, and the round was
    /// dealt in the same step.
    Started(Room),
}

impl Join {
    pub fn room(&self) -> &Room {
        match self {
            Self::Rejoined(room) | Self::Admitted(room) | Self::Started(room) => room,
        }
    }

    pub fn into_room(self) -> Room {
        match self {
            Self::Rejoined(room) | Self::Admitted(room) | Self::Started(room) => room,
        }
    }

    /// Returns `true` if the record must be written back.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Rejoined(_))
    }
}

/// Builds a fresh lobby record.
///
/// # Errors
/// [`RoomError::InvalidConfig`] or [`RoomError::UnknownTheme`] if the
/// settings fail validation.
pub fn open<R: Rng + ?Sized>(
    config: GameConfig,
    catalog: &ThemeCatalog,
    rng: &mut R,
    created_at: u64,
) -> Result<Room, RoomError> {
    validate_game_config(&config, catalog)?;
    let secret_word = catalog.pick_word(&config.theme, rng)?;
    Ok(Room {
        config,
        status: RoomStatus::Lobby,
        secret_word,
        players: Vec::new(),
        turn_order: None,
        created_at,
    })
}

/// Adds a player to the roster, dealing the round if this fills it.
///
/// A player already on the roster always succeeds with
/// [`Join::Rejoined`], whatever the room's status, so a client retry or a
/// page reload never turns into an error.
///
/// # Errors
/// - [`RoomError::RoomFull`]: new player, roster at capacity.
/// - [`RoomError::GameAlreadyStarted`]: new player, room is playing with
///   seats left (a round started early by a reset).
pub fn join<R: Rng + ?Sized>(
    mut room: Room,
    id: &PlayerId,
    name: &PlayerName,
    catalog: &ThemeCatalog,
    rng: &mut R,
) -> Result<Join, RoomError> {
    if room.has_player(id) {
        return Ok(Join::Rejoined(room));
    }
    if room.is_full() {
        return Err(RoomError::RoomFull {
            max_players: room.config.max_players,
        });
    }
    if !room.status.is_joinable() {
        return Err(RoomError::GameAlreadyStarted);
    }

    room.players.push(Player {
        id: id.clone(),
        name: name.clone(),
        role: Role::Native,
    });

    if room.is_full() {
        start(&mut room, catalog, rng)?;
        Ok(Join::Started(room))
    } else {
        Ok(Join::Admitted(room))
    }
}

/// Deals a round over the current roster: new word, new roles, new turn
/// order, status `Playing`. Roster membership and order are untouched.
pub fn start<R: Rng + ?Sized>(
    room: &mut Room,
    catalog: &ThemeCatalog,
    rng: &mut R,
) -> Result<(), RoomError> {
    let roles = assign_roles(room.players.len(), room.config.impostors_count, rng)?;
    let secret_word = catalog.pick_word(&room.config.theme, rng)?;
    let order = turn_order(&room.names(), rng);

    for (player, role) in room.players.iter_mut().zip(roles) {
        player.role = role;
    }
    room.secret_word = secret_word;
    room.turn_order = Some(order);
    room.status = RoomStatus::Playing;
    Ok(())
}

/// Starts a new round without anyone re-joining.
///
/// Works from the lobby too, which is how a room starts before the
/// roster is full. `config` is never modified.
///
/// # Errors
/// [`RoomError::NotEnoughPlayers`] if the roster has no more players
/// than impostors; the caller writes nothing.
pub fn reset<R: Rng + ?Sized>(
    mut room: Room,
    catalog: &ThemeCatalog,
    rng: &mut R,
) -> Result<Room, RoomError> {
    start(&mut room, catalog, rng)?;
    Ok(room)
}

/// Checks every record invariant. Called on each computed record before
/// it is written.
pub fn check_invariants(room: &Room, catalog: &ThemeCatalog) -> Result<(), RoomError> {
    let violation = |msg: String| Err(RoomError::InvariantViolation(msg));

    if room.players.len() > room.config.max_players {
        return violation(format!(
            "{} players exceed capacity {}",
            room.players.len(),
            room.config.max_players
        ));
    }
    for (i, player) in room.players.iter().enumerate() {
        if room.players[..i].iter().any(|p| p.id == player.id) {
            return violation(format!("player {} appears twice", player.id));
        }
    }
    if !catalog.contains_word(&room.config.theme, &room.secret_word) {
        return violation(format!("secret word is not part of theme {}", room.config.theme));
    }

    match room.status {
        RoomStatus::Lobby => {
            if room.turn_order.is_some() {
                return violation("lobby room has a turn order".into());
            }
            if room.impostors().next().is_some() {
                return violation("lobby room has impostors".into());
            }
        }
        RoomStatus::Playing => {
            let impostors = room.impostors().count();
            if impostors != room.config.impostors_count {
                return violation(format!(
                    "{impostors} impostors dealt, expected {}",
                    room.config.impostors_count
                ));
            }
            let Some(order) = &room.turn_order else {
                return violation("playing room has no turn order".into());
            };
            let mut order: Vec<&str> = order.iter().map(PlayerName::as_str).collect();
            let mut names: Vec<&str> = room.players.iter().map(|p| p.name.as_str()).collect();
            order.sort_unstable();
            names.sort_unstable();
            if order != names {
                return violation("turn order is not a permutation of the roster".into());
            }
        }
    }
    Ok(())
}

// =========================================================================
// Tests
// =========================================================================
