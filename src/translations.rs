//! Translation Resolver: localized place names with a fixed fallback chain.
//!
//! For a requested language `L` a place's name resolves to the `L` row, then
//! the English row, then the place slug. Descriptions follow the same chain
//! and end at the empty string.

use serde::Serialize;
use sqlx::FromRow;
use std::collections::HashMap;
use tracing::info;

use crate::db::Database;
use crate::error::{Result, WayfindingError};

pub const FALLBACK_LANGUAGE: &str = "en";

/// Trim and lower-case a language code the way it is stored.
pub fn normalize_language(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Resolved display text for one place
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TranslationRow {
    pub place_id: i64,
    pub language_code: String,
    pub name: String,
    pub description: String,
}

/// Apply the fallback chain to whatever rows exist.
pub fn resolve(
    requested: Option<&TranslationRow>,
    english: Option<&TranslationRow>,
    slug: &str,
) -> LocalizedText {
    let name = requested
        .or(english)
        .map(|row| row.name.clone())
        .unwrap_or_else(|| slug.to_string());
    let description = requested
        .or(english)
        .map(|row| row.description.clone())
        .unwrap_or_default();

    LocalizedText { name, description }
}

/// Requested-language and English rows for every place, loaded in one query.
#[derive(Debug, Default)]
pub struct TranslationIndex {
    requested: HashMap<i64, TranslationRow>,
    english: HashMap<i64, TranslationRow>,
}

impl TranslationIndex {
    pub fn from_rows(language: &str, rows: Vec<TranslationRow>) -> Self {
        let language = normalize_language(language);
        let mut index = TranslationIndex::default();
        for row in rows {
            if row.language_code == language {
                index.requested.insert(row.place_id, row);
            } else if row.language_code == FALLBACK_LANGUAGE {
                index.english.insert(row.place_id, row);
            }
        }
        index
    }

    pub fn resolve(&self, place_id: i64, slug: &str) -> LocalizedText {
        resolve(
            self.requested.get(&place_id),
            self.english.get(&place_id),
            slug,
        )
    }
}

impl Database {
    /// Load the translation rows needed to resolve any place in `language`.
    pub async fn translation_index(&self, language: &str) -> Result<TranslationIndex> {
        let normalized = normalize_language(language);
        let rows: Vec<TranslationRow> = sqlx::query_as(
            "SELECT place_id, language_code, name, description
             FROM place_translations
             WHERE language_code IN (?1, ?2)",
        )
        .bind(&normalized)
        .bind(FALLBACK_LANGUAGE)
        .fetch_all(self.pool())
        .await?;

        Ok(TranslationIndex::from_rows(&normalized, rows))
    }

    /// Resolve a single place's name and description.
    pub async fn resolve_translation(&self, place_id: i64, language: &str) -> Result<LocalizedText> {
        let slug: Option<String> = sqlx::query_scalar("SELECT slug FROM places WHERE id = ?1")
            .bind(place_id)
            .fetch_optional(self.pool())
            .await?;
        let slug =
            slug.ok_or_else(|| WayfindingError::not_found(format!("Place {} not found.", place_id)))?;

        self.place_text(place_id, &slug, language).await
    }

    /// Resolve one place whose slug is already known.
    pub(crate) async fn place_text(
        &self,
        place_id: i64,
        slug: &str,
        language: &str,
    ) -> Result<LocalizedText> {
        let normalized = normalize_language(language);
        let rows: Vec<TranslationRow> = sqlx::query_as(
            "SELECT place_id, language_code, name, description
             FROM place_translations
             WHERE place_id = ?1 AND language_code IN (?2, ?3)",
        )
        .bind(place_id)
        .bind(&normalized)
        .bind(FALLBACK_LANGUAGE)
        .fetch_all(self.pool())
        .await?;

        Ok(TranslationIndex::from_rows(&normalized, rows).resolve(place_id, slug))
    }

    /// Insert or overwrite the `(place, language)` translation.
    ///
    /// The place id is not checked; writing for an unknown id leaves an
    /// unreachable row behind.
    pub async fn update_translation(
        &self,
        language: &str,
        place_id: i64,
        name: &str,
        description: &str,
    ) -> Result<()> {
        let mut conn = self.pool().acquire().await?;
        upsert_translation(&mut *conn, language, place_id, name, description).await?;
        info!("Updated '{}' translation for place {}", normalize_language(language), place_id);
        Ok(())
    }
}

/// Upsert on an existing connection or transaction.
pub(crate) async fn upsert_translation(
    conn: &mut sqlx::SqliteConnection,
    language: &str,
    place_id: i64,
    name: &str,
    description: &str,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WayfindingError::validation("Name cannot be empty."));
    }
    let language = normalize_language(language);
    if language.is_empty() {
        return Err(WayfindingError::validation("Language code is required."));
    }

    sqlx::query(
        "INSERT INTO place_translations (place_id, language_code, name, description)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (place_id, language_code) DO UPDATE SET
            name = excluded.name,
            description = excluded.description",
    )
    .bind(place_id)
    .bind(&language)
    .bind(name)
    .bind(description.trim())
    .execute(&mut *conn)
    .await?;

    Ok(())
}
