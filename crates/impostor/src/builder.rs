//! `ImpostorBuilder`: assembles a [`RoomService`] from its parts.

use std::time::Duration;

use impostor_protocol::JsonCodec;
use impostor_room::{GuardStrategy, RoomService, ServiceConfig, ThemeCatalog};
use impostor_store::RoomStore;

use crate::ImpostorError;

/// Builder for a [`RoomService`] with the JSON record format.
///
/// # Example
///
/// ```rust
/// use impostor::prelude::*;
///
/// # fn main() -> Result<(), ImpostorError> {
/// let service = ImpostorBuilder::new()
///     .guard(GuardStrategy::optimistic())
///     .theme("animales", "Animales", ["Perro", "Gato", "Loro"])
///     .build(MemoryStore::new())?;
/// assert!(service.catalog().label_for(&ThemeKey::new("animales")).is_ok());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImpostorBuilder {
    config: ServiceConfig,
    themes: Vec<(String, String, Vec<String>)>,
}

impl ImpostorBuilder {
    /// Creates a builder with default settings and the built-in themes.
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
            themes: Vec::new(),
        }
    }

    /// Replaces the whole service configuration.
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets how long a room lives after its last write.
    pub fn retention(mut self, retention: Duration) -> Self {
        self.config.retention = retention;
        self
    }

    /// Sets the deadline for a single store round-trip.
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.config.store_timeout = timeout;
        self
    }

    pub fn guard(mut self, guard: GuardStrategy) -> Self {
        self.config.guard = guard;
        self
    }

    /// Adds a theme on top of the built-in ones. A key that already
    /// exists is replaced.
    pub fn theme<I, W>(mut self, key: &str, label: &str, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        self.themes.push((
            key.to_string(),
            label.to_string(),
            words.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Builds the service on top of `store`.
    ///
    /// # Errors
    /// An extra theme with no words is `InvalidConfig`.
    pub fn build<S: RoomStore>(self, store: S) -> Result<RoomService<S>, ImpostorError> {
        let mut catalog = ThemeCatalog::default();
        for (key, label, words) in self.themes {
            catalog = catalog.with_theme(&key, &label, words)?;
        }
        tracing::debug!(
            guard = ?self.config.guard,
            retention = ?self.config.retention,
            themes = catalog.themes().count(),
            "room service built"
        );
        let service = RoomService::with_parts(store, JsonCodec, catalog, self.config);
        Ok(service)
    }
}

impl Default for ImpostorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
