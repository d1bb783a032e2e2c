//! Error types for the protocol layer.
//!
//! Each crate in Impostor defines its own error enum. A `ProtocolError`
//! always means the problem is in the data itself: a token, name or id
//! that fails validation, or bytes that are not a room record.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of a record failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The stored bytes could not be parsed back into a record.
    ///
    /// Common causes: a record written by an incompatible version, or
    /// a foreign value stored under a `room:` key.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A caller-supplied value failed validation (empty token, name
    /// too long, blank player id, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
