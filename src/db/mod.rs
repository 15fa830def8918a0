//! Persistence handle and schema bootstrap.
//!
//! Each component (languages, places, connections, dashboards, directions)
//! adds its own `impl Database` block in its module; this file only owns the
//! pool and the schema.

mod seed;

use anyhow::{ensure, Context, Result};
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Transaction;
use std::str::FromStr;
use tracing::info;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS languages (
        code TEXT PRIMARY KEY,
        label TEXT NOT NULL,
        is_default INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS places (
        id INTEGER PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        floor TEXT NOT NULL,
        zone TEXT NOT NULL,
        x REAL NOT NULL,
        y REAL NOT NULL,
        type TEXT NOT NULL DEFAULT 'general',
        image_url TEXT,
        latitude REAL,
        longitude REAL
    )",
    "CREATE TABLE IF NOT EXISTS place_translations (
        place_id INTEGER NOT NULL,
        language_code TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        PRIMARY KEY (place_id, language_code)
    )",
    "CREATE TABLE IF NOT EXISTS connections (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        from_place_id INTEGER NOT NULL REFERENCES places (id) ON DELETE CASCADE,
        to_place_id INTEGER NOT NULL REFERENCES places (id) ON DELETE CASCADE,
        distance REAL NOT NULL,
        orientation TEXT NOT NULL,
        landmark TEXT
    )",
    "CREATE TABLE IF NOT EXISTS dashboards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        slug TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE IF NOT EXISTS dashboard_places (
        dashboard_id INTEGER NOT NULL REFERENCES dashboards (id) ON DELETE CASCADE,
        place_id INTEGER NOT NULL REFERENCES places (id) ON DELETE CASCADE,
        PRIMARY KEY (dashboard_id, place_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_places_slug ON places (slug)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_connections_pair ON connections (from_place_id, to_place_id)",
    "CREATE INDEX IF NOT EXISTS idx_connections_from ON connections (from_place_id)",
    "CREATE INDEX IF NOT EXISTS idx_place_translations_lang ON place_translations (language_code)",
    "CREATE INDEX IF NOT EXISTS idx_dashboard_places_dashboard ON dashboard_places (dashboard_id)",
    "CREATE INDEX IF NOT EXISTS idx_dashboard_places_place ON dashboard_places (place_id)",
];

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and ensure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self> {
        ensure!(
            database_url.starts_with("sqlite:"),
            "Unsupported DATABASE_URL: {}",
            database_url
        );

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid DATABASE_URL: {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", database_url))?;

        let db = Self { pool };
        db.init_schema().await?;
        info!("✓ Database ready at {}", database_url);
        Ok(db)
    }

    /// Private in-memory database, used by tests and previews.
    ///
    /// The pool holds exactly one connection that is never recycled, since
    /// every new SQLite memory connection would start from an empty database.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to apply schema statement: {}", statement))?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction that takes the write lock up front.
    ///
    /// Every multi-row write reads before it writes; a deferred transaction
    /// would fail with `SQLITE_BUSY` when two writers race to upgrade.
    pub(crate) async fn begin_write(
        &self,
    ) -> std::result::Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin_with("BEGIN IMMEDIATE").await
    }
}
