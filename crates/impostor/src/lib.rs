//! # Impostor
//!
//! Room engine for the Impostor word game.
//!
//! Players gather in a room identified by a short token. When the roster
//! reaches the configured size the round is dealt: one secret word from
//! the room's theme, a set of impostors who do not get the word, and a
//! speaking order. The engine keeps every room in a shared key-value
//! store and guarantees that concurrent joins never lose or duplicate a
//! player, and that exactly one join deals the round.
//!
//! ## Quick Start
//!
//! ```rust
//! use impostor::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ImpostorError> {
//! let service = ImpostorBuilder::new().build(MemoryStore::new())?;
//!
//! service.create_room("SALA1", 3, 1, "casa").await?;
//! service.join_room("SALA1", "p1", "Ana").await?;
//! service.join_room("SALA1", "p2", "Bea").await?;
//! let room = service.join_room("SALA1", "p3", "Cin").await?;
//! assert_eq!(room.status, RoomStatus::Playing);
//!
//! let me = PlayerId::parse("p1")?;
//! let view = PlayerView::for_player(&room, &me, service.catalog());
//! assert!(view.is_some());
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod telemetry;
mod view;

pub use builder::ImpostorBuilder;
pub use error::ImpostorError;
pub use telemetry::{DEFAULT_FILTER, init_tracing};
pub use view::PlayerView;

pub mod prelude {
    pub use crate::{ImpostorBuilder, ImpostorError, PlayerView, init_tracing};
    pub use impostor_protocol::{
        Codec, GameConfig, JsonCodec, Player, PlayerId, PlayerName, ProtocolError, Role, Room,
        RoomStatus, RoomToken, ThemeKey,
    };
    pub use impostor_room::{GuardStrategy, RoomError, RoomService, ServiceConfig, ThemeCatalog};
    pub use impostor_store::{MemoryStore, RoomStore, StoreError};
}
