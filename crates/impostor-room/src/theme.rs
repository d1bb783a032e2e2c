//! Word themes the secret word is drawn from.

use impostor_protocol::ThemeKey;
use rand::Rng;

use crate::RoomError;

/// A labelled, non-empty word list.
#[derive(Debug, Clone)]
pub struct Theme {
    pub label: String,
    words: Vec<String>,
}

impl Theme {
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Static mapping from theme key to label and word list.
///
/// `ThemeCatalog::default()` holds the two built-in themes (`casa` and
/// `comidas`). More can be added with [`ThemeCatalog::with_theme`] before
/// the catalog is handed to a room service; after that it is read-only.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<(ThemeKey, Theme)>,
}

impl ThemeCatalog {
    /// A catalog with no themes at all.
    pub fn empty() -> Self {
        Self { themes: Vec::new() }
    }

    /// Adds (or replaces) a theme.
    ///
    /// # Errors
    /// [`RoomError::InvalidConfig`] if `words` is empty.
    pub fn with_theme<I, W>(mut self, key: &str, label: &str, words: I) -> Result<Self, RoomError>
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(RoomError::InvalidConfig(format!(
                "theme {key} has no words"
            )));
        }
        let key = ThemeKey::new(key);
        let theme = Theme {
            label: label.to_string(),
            words,
        };
        match self.themes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = theme,
            None => self.themes.push((key, theme)),
        }
        Ok(self)
    }

    fn theme(&self, key: &ThemeKey) -> Result<&Theme, RoomError> {
        self.themes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, theme)| theme)
            .ok_or_else(|| RoomError::UnknownTheme(key.clone()))
    }

    /// The candidate words of a theme, never empty.
    pub fn words_for(&self, key: &ThemeKey) -> Result<&[String], RoomError> {
        self.theme(key).map(Theme::words)
    }

    /// Display label of a theme.
    pub fn label_for(&self, key: &ThemeKey) -> Result<&str, RoomError> {
        self.theme(key).map(|t| t.label.as_str())
    }

    /// Draws a word uniformly at random from a theme.
    pub fn pick_word<R: Rng + ?Sized>(
        &self,
        key: &ThemeKey,
        rng: &mut R,
    ) -> Result<String, RoomError> {
        let words = self.words_for(key)?;
        Ok(words[rng.random_range(0..words.len())].clone())
    }

    /// Returns `true` if `word` belongs to the theme. Unknown themes
    /// contain nothing.
    pub fn contains_word(&self, key: &ThemeKey, word: &str) -> bool {
        self.words_for(key)
            .map(|words| words.iter().any(|w| w == word))
            .unwrap_or(false)
    }

    /// Every theme as `(key, label)`, in registration order.
    pub fn themes(&self) -> impl Iterator<Item = (&ThemeKey, &str)> {
        self.themes.iter().map(|(k, t)| (k, t.label.as_str()))
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        let themes = vec![
            (
                ThemeKey::new("casa"),
                Theme {
                    label: "Cosas de la casa".into(),
                    words: [
                        "Licuadora", "Sofá", "Cama", "Nevera", "Espejo", "Lámpara",
                        "Martillo", "Toalla", "Reloj", "Silla",
                    ]
                    .map(String::from)
                    .to_vec(),
                },
            ),
            (
                ThemeKey::new("comidas"),
                Theme {
                    label: "Comidas".into(),
                    words: [
                        "Hamburguesa", "Pizza", "Sushi", "Tacos", "Pasta", "Ensalada",
                        "Helado", "Sopa", "Arroz", "Filete",
                    ]
                    .map(String::from)
                    .to_vec(),
                },
            ),
        ];
        Self { themes }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn key(k: &str) -> ThemeKey {
        ThemeKey::new(k)
    }

    #[test]
    fn test_default_catalog_has_builtin_themes() {
        let catalog = ThemeCatalog::default();

        assert_eq!(catalog.label_for(&key("casa")).unwrap(), "Cosas de la casa");
        assert_eq!(catalog.label_for(&key("comidas")).unwrap(), "Comidas");
        assert_eq!(catalog.words_for(&key("casa")).unwrap().len(), 10);
        assert_eq!(catalog.words_for(&key("comidas")).unwrap().len(), 10);
        assert_eq!(catalog.themes().count(), 2);
    }

    #[test]
    fn test_unknown_theme_errors() {
        let catalog = ThemeCatalog::default();
        assert!(matches!(
            catalog.words_for(&key("espacio")),
            Err(RoomError::UnknownTheme(k)) if k.as_str() == "espacio"
        ));
        assert!(catalog.label_for(&key("espacio")).is_err());
        assert!(!catalog.contains_word(&key("espacio"), "Sofá"));
    }

    #[test]
    fn test_pick_word_returns_member() {
        let catalog = ThemeCatalog::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let word = catalog.pick_word(&key("comidas"), &mut rng).unwrap();
            assert!(catalog.contains_word(&key("comidas"), &word));
        }
    }

    #[test]
    fn test_pick_word_covers_whole_list() {
        let catalog = ThemeCatalog::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1_000 {
            seen.insert(catalog.pick_word(&key("casa"), &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn test_with_theme_adds_and_replaces() {
        let catalog = ThemeCatalog::default()
            .with_theme("espacio", "Espacio", ["Cohete", "Luna"])
            .unwrap()
            .with_theme("casa", "Casa", ["Puerta"])
            .unwrap();

        assert_eq!(catalog.themes().count(), 3);
        assert_eq!(catalog.words_for(&key("espacio")).unwrap(), ["Cohete", "Luna"]);
        assert_eq!(catalog.label_for(&key("casa")).unwrap(), "Casa");
        assert_eq!(catalog.words_for(&key("casa")).unwrap(), ["Puerta"]);
    }

    #[test]
    fn test_with_theme_rejects_empty_word_list() {
        let result = ThemeCatalog::empty().with_theme("vacio", "Vacío", Vec::<String>::new());
        assert!(matches!(result, Err(RoomError::InvalidConfig(_))));
    }
}
