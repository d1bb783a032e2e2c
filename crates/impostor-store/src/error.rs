//! Error types for the store layer.

use std::time::Duration;

/// Errors a [`RoomStore`](crate::RoomStore) round-trip can produce.
///
/// Both variants mean the same thing to a caller: the operation may or
/// may not have been applied, and the store should be considered
/// unavailable for now.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected the request or could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The round-trip did not complete within the allotted time.
    #[error("store round-trip timed out after {0:?}")]
    Timeout(Duration),
}
