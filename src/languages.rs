//! Language Registry: supported locales, the default language, and translation back-fill.

use serde::Serialize;
use sqlx::FromRow;
use tracing::info;

use crate::db::Database;
use crate::error::{conflict_on_unique, Result, WayfindingError};
use crate::translations::{normalize_language, FALLBACK_LANGUAGE};

/// A supported UI locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: String,
    pub label: String,
    pub is_default: bool,
}

impl Database {
    /// All languages, the default first, then by label
    pub async fn list_languages(&self) -> Result<Vec<Language>> {
        let languages = sqlx::query_as(
            "SELECT code, label, is_default FROM languages
             ORDER BY is_default DESC, label ASC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(languages)
    }

    /// Code of the language flagged default; the earliest inserted wins a tie.
    /// Falls back to English when no language is flagged.
    pub async fn default_language_code(&self) -> Result<String> {
        let code: Option<String> = sqlx::query_scalar(
            "SELECT code FROM languages WHERE is_default = 1 ORDER BY rowid ASC LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await?;
        Ok(code.unwrap_or_else(|| FALLBACK_LANGUAGE.to_string()))
    }

    /// Register a language and back-fill a translation for every place.
    ///
    /// Back-filled rows copy the English translation when one exists, else
    /// the slug with an empty description. Places that already have a row
    /// in the new language are left alone.
    pub async fn add_language(&self, code: &str, label: &str) -> Result<()> {
        let code = normalize_language(code);
        let label = label.trim();
        if code.is_empty() || label.is_empty() {
            return Err(WayfindingError::validation(
                "Language code and label are required.",
            ));
        }

        let mut tx = self.begin_write().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT code FROM languages WHERE code = ?1")
            .bind(&code)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_some() {
            return Err(WayfindingError::conflict(format!(
                "Language '{}' already exists.",
                code
            )));
        }

        sqlx::query("INSERT INTO languages (code, label, is_default) VALUES (?1, ?2, 0)")
            .bind(&code)
            .bind(label)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "Language already exists."))?;

        let backfilled = sqlx::query(
            "INSERT INTO place_translations (place_id, language_code, name, description)
             SELECT p.id, ?1, COALESCE(en.name, p.slug), COALESCE(en.description, '')
             FROM places p
             LEFT JOIN place_translations en
               ON en.place_id = p.id AND en.language_code = ?2
             WHERE NOT EXISTS (
                SELECT 1 FROM place_translations existing
                WHERE existing.place_id = p.id AND existing.language_code = ?1
             )",
        )
        .bind(&code)
        .bind(FALLBACK_LANGUAGE)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        info!(
            "Added language '{}' ({}), back-filled {} translations",
            code, label, backfilled
        );
        Ok(())
    }
}
