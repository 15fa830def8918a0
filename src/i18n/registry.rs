//! Locale registry: built-in UI strings keyed by language code.
//!
//! Languages themselves live in the database and can be added at runtime.
//! Only a fixed set of locales ships sentence templates; every other code
//! renders with the canonical English strings.

use std::sync::OnceLock;

use super::strings::{
    LocaleStrings, ENGLISH_STRINGS, FRENCH_STRINGS, HEBREW_STRINGS, SPANISH_STRINGS,
};

/// A locale with built-in strings.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 language code (e.g., "en", "he")
    pub code: &'static str,

    /// Whether this is the fallback locale (only one should be true)
    pub is_canonical: bool,

    pub strings: LocaleStrings,
}

pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Look up a locale by code. Matching ignores case and surrounding whitespace.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        let normalized = code.trim().to_lowercase();
        self.locales.iter().find(|locale| locale.code == normalized)
    }

    /// Get the canonical locale configuration.
    ///
    /// # Panics
    /// Panics if the built-in table does not contain exactly one canonical
    /// locale (a programming error).
    pub fn canonical(&self) -> &LocaleConfig {
        let canonical: Vec<_> = self
            .locales
            .iter()
            .filter(|locale| locale.is_canonical)
            .collect();

        match canonical.len() {
            1 => canonical[0],
            0 => panic!("No canonical locale found in registry"),
            _ => panic!("Multiple canonical locales found in registry"),
        }
    }

    /// Strings for a locale, falling back to the canonical locale.
    pub fn strings_for(&self, code: &str) -> &LocaleStrings {
        self.get_by_code(code)
            .map(|locale| &locale.strings)
            .unwrap_or_else(|| &self.canonical().strings)
    }
}

fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            is_canonical: true,
            strings: ENGLISH_STRINGS,
        },
        LocaleConfig {
            code: "he",
            is_canonical: false,
            strings: HEBREW_STRINGS,
        },
        LocaleConfig {
            code: "es",
            is_canonical: false,
            strings: SPANISH_STRINGS,
        },
        LocaleConfig {
            code: "fr",
            is_canonical: false,
            strings: FRENCH_STRINGS,
        },
    ]
}
