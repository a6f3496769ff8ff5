use std::collections::HashMap;

use itertools::Itertools;
use serde::Deserialize;

/// Languages the dashboard texts are available in, the first one is the fallback.
pub const LANGUAGES: [&str; 2] = ["en", "de"];

/// Pick the first preferred language which is available.
///
/// Only the primary subtag matters: `de-AT` and `de_DE.UTF-8` both select `de`.
#[must_use]
pub fn select_language<'a>(preferred: &[impl AsRef<str>], available: &[&'a str]) -> Option<&'a str> {
    preferred
        .iter()
        .map(|language| language.as_ref().chars().take(2).collect::<String>().to_lowercase())
        .unique()
        .find_map(|language| available.iter().copied().find(|available| *available == language))
        .or_else(|| available.first().copied())
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Missing keys are rendered as `{{key}}`, so they stand out.
    Strict,

    /// Missing keys are rendered as they are, for texts which may come untranslated.
    Lazy,
}

/// Flat key-to-text mapping as served by the API.
#[must_use]
#[derive(Clone, Debug, Default, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct Translator(HashMap<String, String>);

impl Translator {
    #[must_use]
    pub fn translate(&self, key: &str, mode: Mode) -> String {
        match self.0.get(key).filter(|text| !text.is_empty()) {
            Some(text) => text.clone(),
            None if mode == Mode::Lazy => key.to_owned(),
            None => format!("{{{{{key}}}}}"),
        }
    }

    #[must_use]
    pub fn strict(&self, key: &str) -> String {
        self.translate(key, Mode::Strict)
    }

    #[must_use]
    pub fn lazy(&self, key: &str) -> String {
        self.translate(key, Mode::Lazy)
    }

    #[must_use]
    pub fn n_texts(&self) -> usize {
        self.0.len()
    }
}
