//! Storage layer for Impostor room records.
//!
//! The room core never talks to a database directly. It talks to a
//! [`RoomStore`]: a key-value collaborator holding one opaque record per
//! room, with a time-to-live on every key.
//!
//! - **Contract** ([`RoomStore`], [`Versioned`]): the operations the core
//!   needs, including the two conditional writes (`set_if_absent`,
//!   `compare_and_set`) that close read-modify-write races.
//! - **Reference store** ([`MemoryStore`]): an in-process implementation
//!   with lazy TTL expiry, used by tests and the demo.
//! - **Key scheme** ([`room_key`]): `room:<TOKEN>`.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room layer (above)  ← reads, computes and writes whole records
//!     ↕
//! Store layer (this crate)  ← bytes + version + TTL per key
//! ```

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{KEY_PREFIX, ROOM_TTL, RoomStore, Versioned, room_key};
