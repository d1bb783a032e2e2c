//! Room lifecycle for Impostor.
//!
//! A room moves `lobby → playing` when its roster fills (or when someone
//! resets it early) and is re-dealt on every reset. All of that state
//! lives in a store shared by concurrent request handlers, so every
//! mutation goes through a per-room guard.
//!
//! # Key types
//!
//! - [`RoomService`]: the operation surface (create, check, join, status, reset)
//! - [`ConcurrencyGuard`] / [`GuardStrategy`]: per-token serialization
//! - [`ThemeCatalog`]: word lists and labels
//! - [`assign_roles`] / [`turn_order`]: unbiased role dealing and speaking order
//! - [`machine`]: the pure record transitions the service is built on
//! - [`ServiceConfig`]: retention, store deadline, guard strategy

mod backend;
mod config;
mod error;
mod guard;
pub mod machine;
mod roles;
mod service;
mod theme;

pub use config::{GuardStrategy, ServiceConfig, validate_game_config};
pub use error::RoomError;
pub use guard::ConcurrencyGuard;
pub use roles::{assign_roles, turn_order};
pub use service::RoomService;
pub use theme::{Theme, ThemeCatalog};
