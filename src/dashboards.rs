//! Dashboard Registry: named, curated subsets of places.

use regex::Regex;
use serde::Serialize;
use sqlx::FromRow;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use tracing::info;

use crate::db::Database;
use crate::error::{conflict_on_unique, Result, WayfindingError};

/// Base slug used when a name has no ASCII letters or digits
const FALLBACK_SLUG: &str = "dashboard";

static NON_ALPHANUMERIC_RUN: OnceLock<Regex> = OnceLock::new();

/// Lower-case, collapse runs of non-alphanumeric characters to one hyphen,
/// and trim hyphens from both ends.
pub fn slugify(value: &str) -> String {
    let regex = NON_ALPHANUMERIC_RUN
        .get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));
    regex
        .replace_all(&value.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub place_ids: Vec<i64>,
}

#[derive(Debug, FromRow)]
struct DashboardRow {
    id: i64,
    slug: String,
    name: String,
    description: String,
}

impl Database {
    /// Create a dashboard and its place associations in one transaction.
    ///
    /// Duplicate ids collapse. Any unknown place id fails the whole call
    /// with nothing persisted. A slug collision appends `-1`, `-2`, ...
    pub async fn create_dashboard(
        &self,
        name: &str,
        description: Option<&str>,
        place_ids: &[i64],
    ) -> Result<DashboardSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WayfindingError::validation("Dashboard name is required."));
        }

        let mut seen = HashSet::new();
        let unique_ids: Vec<i64> = place_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if unique_ids.is_empty() {
            return Err(WayfindingError::validation(
                "Select at least one place for the dashboard.",
            ));
        }
        let description = description.unwrap_or("").trim().to_string();

        let mut tx = self.begin_write().await?;

        for place_id in &unique_ids {
            let found: Option<i64> = sqlx::query_scalar("SELECT id FROM places WHERE id = ?1")
                .bind(place_id)
                .fetch_optional(&mut *tx)
                .await?;
            if found.is_none() {
                return Err(WayfindingError::not_found(format!(
                    "Place {} could not be found.",
                    place_id
                )));
            }
        }

        let base = match slugify(name) {
            slug if slug.is_empty() => FALLBACK_SLUG.to_string(),
            slug => slug,
        };
        let mut slug = base.clone();
        let mut suffix = 1;
        loop {
            let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM dashboards WHERE slug = ?1")
                .bind(&slug)
                .fetch_optional(&mut *tx)
                .await?;
            if taken.is_none() {
                break;
            }
            slug = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        let dashboard_id = sqlx::query(
            "INSERT INTO dashboards (slug, name, description) VALUES (?1, ?2, ?3)",
        )
        .bind(&slug)
        .bind(name)
        .bind(&description)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "A dashboard with this slug already exists."))?
        .last_insert_rowid();

        for place_id in &unique_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO dashboard_places (dashboard_id, place_id) VALUES (?1, ?2)",
            )
            .bind(dashboard_id)
            .bind(place_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(
            "Created dashboard {} '{}' with {} places",
            dashboard_id,
            slug,
            unique_ids.len()
        );

        Ok(DashboardSummary {
            id: dashboard_id,
            slug,
            name: name.to_string(),
            description,
            place_ids: unique_ids,
        })
    }

    /// All dashboards by name ignoring case, each with its place ids
    pub async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>> {
        let rows: Vec<DashboardRow> = sqlx::query_as(
            "SELECT id, slug, name, description FROM dashboards
             ORDER BY name COLLATE NOCASE ASC, id ASC",
        )
        .fetch_all(self.pool())
        .await?;

        let links: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT dashboard_id, place_id FROM dashboard_places ORDER BY dashboard_id, place_id",
        )
        .fetch_all(self.pool())
        .await?;

        let mut members: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for (dashboard_id, place_id) in links {
            members.entry(dashboard_id).or_default().push(place_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| DashboardSummary {
                place_ids: members.remove(&row.id).unwrap_or_default(),
                id: row.id,
                slug: row.slug,
                name: row.name,
                description: row.description,
            })
            .collect())
    }

    /// Dashboards whose place set contains `place_id`
    pub async fn list_dashboards_containing(&self, place_id: i64) -> Result<Vec<DashboardSummary>> {
        let dashboards = self.list_dashboards().await?;
        Ok(dashboards
            .into_iter()
            .filter(|dashboard| dashboard.place_ids.contains(&place_id))
            .collect())
    }

    pub(crate) async fn dashboard_place_ids(&self, dashboard_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar("SELECT place_id FROM dashboard_places WHERE dashboard_id = ?1")
            .bind(dashboard_id)
            .fetch_all(self.pool())
            .await?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::NewPlace;
    use proptest::prelude::*;

    async fn setup(count: usize) -> (Database, Vec<i64>) {
        let db = Database::connect_in_memory().await.expect("Should open");
        let mut ids = Vec::new();
        for i in 0..count {
            let place = db
                .create_place(NewPlace {
                    slug: format!("place-{}", i),
                    floor: "Ground".to_string(),
                    zone: "Main".to_string(),
                    ..Default::default()
                })
                .await
                .expect("Should create place");
            ids.push(place.id);
        }
        (db, ids)
    }

    async fn row_counts(db: &Database) -> (i64, i64) {
        let dashboards = sqlx::query_scalar("SELECT COUNT(*) FROM dashboards")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let links = sqlx::query_scalar("SELECT COUNT(*) FROM dashboard_places")
            .fetch_one(db.pool())
            .await
            .unwrap();
        (dashboards, links)
    }

    // ==================== slugify Tests ====================

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Family Care Tour"), "family-care-tour");
        assert_eq!(slugify("  --Critical  Care!! Path-- "), "critical-care-path");
        assert_eq!(slugify("Wing B / Level 2"), "wing-b-level-2");
        assert_eq!(slugify("מסלול משפחות"), "");
    }

    proptest! {
        #[test]
        fn prop_slug_is_url_safe(name in ".{0,40}") {
            let slug = slugify(&name);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }

    // ==================== create_dashboard Tests ====================

    #[tokio::test]
    async fn test_create_dashboard() {
        let (db, ids) = setup(3).await;
        let dashboard = db
            .create_dashboard(" Critical Care ", Some(" Urgent wings "), &[ids[2], ids[0], ids[2]])
            .await
            .expect("Should create");

        assert_eq!(dashboard.slug, "critical-care");
        assert_eq!(dashboard.name, "Critical Care");
        assert_eq!(dashboard.description, "Urgent wings");
        assert_eq!(dashboard.place_ids, vec![ids[2], ids[0]]);
        assert_eq!(row_counts(&db).await, (1, 2));
    }

    #[tokio::test]
    async fn test_slug_collisions_get_numeric_suffix() {
        let (db, ids) = setup(1).await;
        let first = db.create_dashboard("Tour", None, &[ids[0]]).await.unwrap();
        let second = db.create_dashboard("Tour", None, &[ids[0]]).await.unwrap();
        let third = db.create_dashboard("TOUR!", None, &[ids[0]]).await.unwrap();
        assert_eq!(first.slug, "tour");
        assert_eq!(second.slug, "tour-1");
        assert_eq!(third.slug, "tour-2");
    }

    #[tokio::test]
    async fn test_non_ascii_name_uses_fallback_slug() {
        let (db, ids) = setup(1).await;
        let first = db.create_dashboard("קמפוס", None, &[ids[0]]).await.unwrap();
        let second = db.create_dashboard("מסלול", None, &[ids[0]]).await.unwrap();
        assert_eq!(first.slug, "dashboard");
        assert_eq!(second.slug, "dashboard-1");
    }

    #[tokio::test]
    async fn test_unknown_place_fails_atomically() {
        let (db, ids) = setup(2).await;
        let err = db
            .create_dashboard("Tour", None, &[ids[0], 999, ids[1]])
            .await
            .unwrap_err();
        assert!(matches!(err, WayfindingError::NotFound(_)));
        assert_eq!(row_counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn test_validation() {
        let (db, ids) = setup(1).await;
        let err = db.create_dashboard("   ", None, &[ids[0]]).await.unwrap_err();
        assert!(matches!(err, WayfindingError::Validation(_)));
        let err = db.create_dashboard("Tour", None, &[]).await.unwrap_err();
        assert!(matches!(err, WayfindingError::Validation(_)));
        assert_eq!(row_counts(&db).await, (0, 0));
    }

    // ==================== list Tests ====================

    #[tokio::test]
    async fn test_list_dashboards_sorted_with_members() {
        let (db, ids) = setup(3).await;
        db.create_dashboard("zoo", None, &[ids[0]]).await.unwrap();
        db.create_dashboard("Atrium", None, &[ids[1], ids[2]]).await.unwrap();
        db.create_dashboard("beta", None, &[ids[2]]).await.unwrap();

        let dashboards = db.list_dashboards().await.unwrap();
        let names: Vec<_> = dashboards.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Atrium", "beta", "zoo"]);

        let mut atrium = dashboards[0].place_ids.clone();
        atrium.sort();
        assert_eq!(atrium, vec![ids[1], ids[2]]);
    }

    #[tokio::test]
    async fn test_list_dashboards_containing() {
        let (db, ids) = setup(3).await;
        db.create_dashboard("One", None, &[ids[0], ids[1]]).await.unwrap();
        db.create_dashboard("Two", None, &[ids[1]]).await.unwrap();

        let containing: Vec<_> = db
            .list_dashboards_containing(ids[1])
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(containing, vec!["One", "Two"]);

        assert_eq!(db.list_dashboards_containing(ids[0]).await.unwrap().len(), 1);
        assert!(db.list_dashboards_containing(ids[2]).await.unwrap().is_empty());
    }
}
