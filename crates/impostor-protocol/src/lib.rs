//! Record types for Impostor rooms.
//!
//! This crate defines the shape of the data every other layer agrees on:
//!
//! - **Types** ([`Room`], [`Player`], [`GameConfig`], [`RoomToken`], etc.):
//!   the persisted room record and the validated identifiers used to
//!   address it.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how a record is turned
//!   into the bytes the store keeps.
//! - **Errors** ([`ProtocolError`]): malformed input or undecodable bytes.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about the store or about concurrency.
//! It only knows what a valid room looks like on the wire.
//!
//! ```text
//! Room layer (state machine) → Protocol (Room record) → Store (bytes)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    GameConfig, MAX_NAME_CHARS, MAX_PLAYERS, MAX_TOKEN_CHARS, MIN_PLAYERS,
    Player, PlayerId, PlayerName, Role, Room, RoomStatus, RoomToken, ThemeKey,
};
