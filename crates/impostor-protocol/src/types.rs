//! Core record types for an Impostor room.
//!
//! Everything in this module is what gets serialized into the store under
//! `room:<TOKEN>`. The JSON shape (camelCase fields, lowercase enums) is
//! the one clients already poll, so the serde attributes here are part of
//! the contract, not a cosmetic choice.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Smallest roster a room can be configured for.
pub const MIN_PLAYERS: usize = 3;

/// Largest roster a room can be configured for.
pub const MAX_PLAYERS: usize = 50;

/// Longest display name a player may register, in characters.
pub const MAX_NAME_CHARS: usize = 15;

/// Longest room token accepted, in characters.
pub const MAX_TOKEN_CHARS: usize = 32;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The shareable invite code of a room, also used as its storage key.
///
/// Tokens are case-normalized: `sala1`, ` Sala1 ` and `SALA1` all address
/// the same room. The only way to build one is [`RoomToken::parse`], so a
/// `RoomToken` in hand is always non-empty and upper-case.
///
/// `#[serde(transparent)]` keeps the JSON form a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomToken(String);

impl RoomToken {
    /// Validates and normalizes a caller-supplied token.
    ///
    /// Surrounding whitespace is dropped and the rest is upper-cased.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidInput`] if the result is empty, longer than
    /// [`MAX_TOKEN_CHARS`], or contains whitespace.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let token = raw.trim().to_uppercase();
        if token.is_empty() {
            return Err(ProtocolError::InvalidInput("token is required".into()));
        }
        if token.chars().count() > MAX_TOKEN_CHARS {
            return Err(ProtocolError::InvalidInput(format!(
                "token must be at most {MAX_TOKEN_CHARS} characters"
            )));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(ProtocolError::InvalidInput(
                "token must not contain whitespace".into(),
            ));
        }
        Ok(Self(token))
    }

    /// Returns the normalized token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A client-generated player identifier, stable per device.
///
/// The core treats it as an opaque correlation key. The only check is
/// that it is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps a caller-supplied id.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidInput`] if the id is empty or whitespace.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        if raw.trim().is_empty() {
            return Err(ProtocolError::InvalidInput("player id is required".into()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player's display name: trimmed, non-empty, at most
/// [`MAX_NAME_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    /// # Errors
    /// [`ProtocolError::InvalidInput`] if the trimmed name is empty or
    /// too long.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ProtocolError::InvalidInput("name is required".into()));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(ProtocolError::InvalidInput(format!(
                "name must be at most {MAX_NAME_CHARS} characters"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a word theme (`"casa"`, `"comidas"`, ...).
///
/// Whether the key is actually known is the theme catalog's business,
/// not this type's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeKey(String);

impl ThemeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Role and status
// ---------------------------------------------------------------------------

/// The secret role a player holds for the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees the secret word.
    #[default]
    Native,
    /// Does not see the secret word and has to bluff.
    Impostor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Impostor => write!(f, "impostor"),
        }
    }
}

/// The lifecycle state of a room.
///
/// ```text
/// Lobby ──(roster fills, or reset)──→ Playing ──(reset)──→ Playing
/// ```
///
/// There is no way back to `Lobby`: once a room has started it never
/// waits for more players again. `reset` only deals a new round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Waiting for the roster to fill.
    Lobby,
    /// Roles and word have been dealt.
    Playing,
}

impl RoomStatus {
    /// Returns `true` if genuinely new players may still be admitted.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Playing => write!(f, "playing"),
        }
    }
}

// ---------------------------------------------------------------------------
// Room record
// ---------------------------------------------------------------------------

/// Settings fixed when a room is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Roster size; the round starts as soon as it is reached.
    pub max_players: usize,
    /// How many players are dealt the impostor role each round.
    pub impostors_count: usize,
    /// Which word list the secret word is drawn from.
    pub theme: ThemeKey,
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub role: Role,
}

/// The persisted state of one room.
///
/// Each write replaces the whole record; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub config: GameConfig,
    pub status: RoomStatus,
    pub secret_word: String,
    /// Join order. The first entry is the room's admin by convention.
    pub players: Vec<Player>,
    /// Speaking order for the current round. `None` while in the lobby.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_order: Option<Vec<PlayerName>>,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl Room {
    /// Looks up a roster entry by player id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Returns `true` if `id` is already on the roster.
    pub fn has_player(&self, id: &PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Returns `true` once the roster has reached `max_players`.
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.config.max_players
    }

    /// The first player to join, shown as the room's admin.
    ///
    /// Admin is a display convention only; nothing in the core restricts
    /// what other players can do.
    pub fn admin(&self) -> Option<&Player> {
        self.players.first()
    }

    /// Iterates over the players dealt the impostor role.
    pub fn impostors(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.role == Role::Impostor)
    }

    /// Display names in join order.
    pub fn names(&self) -> Vec<PlayerName> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }
}

// =========================================================================
// Tests
// =========================================================================
