//! What one player is allowed to see of a room.
//!
//! Room records carry every role and the secret word. Before a record
//! goes out to a client it has to be cut down to that client's view:
//! impostors get no word, nobody sees anyone else's role.

use impostor_protocol::{PlayerId, PlayerName, Role, Room, RoomStatus};
use impostor_room::ThemeCatalog;
use serde::Serialize;

/// A room as seen by one of its players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub status: RoomStatus,
    pub role: Role,
    /// `None` for impostors and while the room is in the lobby.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_word: Option<String>,
    /// The first player to join is shown as the room admin.
    pub is_admin: bool,
    /// Human-readable theme name, falling back to the key.
    pub theme: String,
    pub players: Vec<PlayerName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_order: Option<Vec<PlayerName>>,
    pub max_players: usize,
}

impl PlayerView {
    /// Builds `player_id`'s view of `room`, or `None` if they are not on
    /// the roster.
    pub fn for_player(room: &Room, player_id: &PlayerId, catalog: &ThemeCatalog) -> Option<Self> {
        let me = room.player(player_id)?;
        let dealt = room.status == RoomStatus::Playing;

        let secret_word = match (dealt, me.role) {
            (true, Role::Native) => Some(room.secret_word.clone()),
            _ => None,
        };
        let is_admin = room.admin().is_some_and(|admin| admin.id == me.id);
        let theme = catalog
            .label_for(&room.config.theme)
            .map(str::to_string)
            .unwrap_or_else(|_| room.config.theme.to_string());

        Some(Self {
            status: room.status,
            role: me.role,
            secret_word,
            is_admin,
            theme,
            players: room.names(),
            turn_order: room.turn_order.clone(),
            max_players: room.config.max_players,
        })
    }

    pub fn is_impostor(&self) -> bool {
        self.role == Role::Impostor
    }
}
