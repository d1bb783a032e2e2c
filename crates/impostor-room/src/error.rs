//! Error types for the room layer.

use impostor_protocol::{ProtocolError, RoomToken, ThemeKey};
use impostor_store::StoreError;

/// Errors that can occur during room operations.
///
/// Every variant is a distinct, recoverable outcome for the caller. None
/// of them should take the process down.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// A token, player id or name failed validation. Nothing was read
    /// from or written to the store.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Room settings out of bounds (player count, impostor count).
    #[error("invalid room config: {0}")]
    InvalidConfig(String),

    /// `create` hit a token that is already in use.
    #[error("room {0} already exists")]
    AlreadyExists(RoomToken),

    /// No live record for this token.
    #[error("room {0} not found")]
    NotFound(RoomToken),

    /// A player who is not on the roster tried to join after the round
    /// was dealt.
    #[error("game already started")]
    GameAlreadyStarted,

    /// The roster is at capacity.
    #[error("room is full ({max_players} players)")]
    RoomFull { max_players: usize },

    /// The theme key is not in the catalog.
    #[error("unknown theme {0}")]
    UnknownTheme(ThemeKey),

    /// Roles cannot be dealt: an impostor count needs strictly more
    /// players than impostors.
    #[error("not enough players to deal {impostors} impostor(s): {players} joined")]
    NotEnoughPlayers { players: usize, impostors: usize },

    /// A computed record broke a room invariant and was not written.
    #[error("room invariant violated: {0}")]
    InvariantViolation(String),

    /// The stored bytes are not a valid room record.
    #[error("stored room record is corrupted: {0}")]
    Corrupted(String),

    /// The store failed, timed out, or the optimistic retry budget ran
    /// out. A mutating call that ends here may or may not have applied.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl From<ProtocolError> for RoomError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::InvalidInput(reason) => Self::InvalidInput(reason),
            ProtocolError::Decode(e) => Self::Corrupted(e.to_string()),
            ProtocolError::Encode(e) => {
                Self::InvariantViolation(format!("room record cannot be encoded: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use impostor_protocol::{Codec, JsonCodec, Room};

    use super::*;

    #[test]
    fn test_protocol_invalid_input_maps_to_invalid_input() {
        let err: RoomError = ProtocolError::InvalidInput("token is required".into()).into();
        assert!(matches!(err, RoomError::InvalidInput(ref r) if r == "token is required"));
    }

    #[test]
    fn test_protocol_decode_failure_is_corrupted() {
        let err = JsonCodec.decode::<Room>(b"{\"status\":").unwrap_err();
        assert!(matches!(RoomError::from(err), RoomError::Corrupted(_)));
    }

    #[test]
    fn test_protocol_encode_failure_is_not_reported_as_corrupted() {
        // JSON object keys must be strings.
        let unencodable = HashMap::from([((1u8, 2u8), 0u8)]);
        let err = JsonCodec.encode(&unencodable).unwrap_err();
        assert!(matches!(err, ProtocolError::Encode(_)));

        let err = RoomError::from(err);

        assert!(matches!(err, RoomError::InvariantViolation(ref m) if m.contains("encoded")));
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: RoomError = StoreError::Unavailable("connection refused".into()).into();
        assert!(matches!(err, RoomError::StoreUnavailable(_)));
        assert_eq!(err.to_string(), "store unavailable: connection refused");
    }

    #[test]
    fn test_room_full_message_names_capacity() {
        let err = RoomError::RoomFull { max_players: 4 };
        assert_eq!(err.to_string(), "room is full (4 players)");
    }
}
