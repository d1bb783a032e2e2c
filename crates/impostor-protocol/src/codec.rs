//! Codec trait and implementations for turning room records into bytes.
//!
//! The store keeps opaque byte values. Whatever sits above it picks a
//! [`Codec`] to convert a [`Room`](crate::Room) to and from those bytes.
//! [`JsonCodec`] produces the same JSON document the web client
//! polls, so it is the default everywhere.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because a codec lives inside the room service,
/// which is shared across request tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or do not
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature (enabled by default).
///
/// ```rust
/// use impostor_protocol::{Codec, JsonCodec, RoomStatus};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&RoomStatus::Lobby).unwrap();
/// assert_eq!(bytes, b"\"lobby\"");
///
/// let status: RoomStatus = codec.decode(&bytes).unwrap();
/// assert_eq!(status, RoomStatus::Lobby);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
