//! Unified error type for the Impostor engine.

use impostor_protocol::ProtocolError;
use impostor_room::RoomError;
use impostor_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// Callers going through the `impostor` crate match on this one type
/// instead of importing each sub-crate's error. The `#[from]` attributes
/// let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ImpostorError {
    /// Record encoding or input validation failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The store could not be reached or timed out.
    ///
    /// `RoomService` reports store failures as
    /// `RoomError::StoreUnavailable`; this variant is for callers that
    /// talk to a [`RoomStore`](impostor_store::RoomStore) directly.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A room operation was refused.
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl ImpostorError {
    /// `true` when the failure is on the storage side and the request may
    /// succeed if sent again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Room(RoomError::StoreUnavailable(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use impostor_protocol::RoomToken;

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidInput("bad".into());
        let impostor_err: ImpostorError = err.into();
        assert!(matches!(impostor_err, ImpostorError::Protocol(_)));
        assert!(impostor_err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Timeout(Duration::from_secs(2));
        let impostor_err: ImpostorError = err.into();
        assert!(matches!(impostor_err, ImpostorError::Store(_)));
        assert!(impostor_err.is_transient());
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomToken::parse("SALA1").unwrap());
        let impostor_err: ImpostorError = err.into();
        assert!(matches!(impostor_err, ImpostorError::Room(_)));
        assert!(impostor_err.to_string().contains("SALA1"));
        assert!(!impostor_err.is_transient());
    }

    #[test]
    fn test_wrapped_store_failure_is_transient() {
        let err = RoomError::from(StoreError::Unavailable("down".into()));
        assert!(ImpostorError::from(err).is_transient());
    }
}
