//! Bilingual (English/Arabic) text

use serde::{Deserialize, Serialize};

/// Text carried in both supported languages.
///
/// The server returns `{ "en": .., "ar": .. }` for detail views and a plain
/// string when the response was localized through the locale header. A plain
/// string fills both languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LocalizedRepr")]
pub struct Localized {
    pub en: String,
    pub ar: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocalizedRepr {
    Pair {
        #[serde(default)]
        en: Option<String>,
        #[serde(default)]
        ar: Option<String>,
    },
    Single(String),
}

impl From<LocalizedRepr> for Localized {
    fn from(repr: LocalizedRepr) -> Self {
        match repr {
            LocalizedRepr::Pair { en, ar } => Self {
                en: en.unwrap_or_default(),
                ar: ar.unwrap_or_default(),
            },
            LocalizedRepr::Single(text) => Self {
                ar: text.clone(),
                en: text,
            },
        }
    }
}

impl Localized {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Text for a locale tag (`"ar"` or anything else for English).
    ///
    /// Falls back to the other language when the requested one is empty.
    pub fn get(&self, locale: &str) -> &str {
        let (primary, fallback) = if locale.starts_with("ar") {
            (&self.ar, &self.en)
        } else {
            (&self.en, &self.ar)
        };
        if primary.is_empty() { fallback } else { primary }
    }

    /// Both sides empty (after trimming)
    pub fn is_blank(&self) -> bool {
        self.en.trim().is_empty() && self.ar.trim().is_empty()
    }

    /// Multipart-style pairs: `field[en]`, `field[ar]`
    pub fn form_pairs(&self, field: &str) -> [(String, String); 2] {
        [
            (format!("{field}[en]"), self.en.clone()),
            (format!("{field}[ar]"), self.ar.clone()),
        ]
    }
}

impl std::fmt::Display for Localized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.get("en"))
    }
}
