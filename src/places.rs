//! Place Registry: creation, lookup and listing of points of interest.

use serde::Serialize;
use sqlx::FromRow;
use std::collections::HashSet;
use tracing::info;

use crate::db::Database;
use crate::error::{conflict_on_unique, Result, WayfindingError};
use crate::i18n;
use crate::orientation::Orientation;
use crate::translations::{
    normalize_language, upsert_translation, LocalizedText, FALLBACK_LANGUAGE,
};

/// Geographic anchor of planar coordinate (0, 0).
pub const PLACE_BASE_LATITUDE: f64 = 31.6638;
pub const PLACE_BASE_LONGITUDE: f64 = 34.5599;
/// Degrees per planar unit.
pub const PLACE_COORDINATE_SCALE: f64 = 0.00001;

pub const DEFAULT_PLACE_TYPE: &str = "general";

/// Latitude/longitude for planar coordinates, `y` northwards and `x` eastwards.
pub fn derive_geo(x: f64, y: f64) -> (f64, f64) {
    (
        PLACE_BASE_LATITUDE + y * PLACE_COORDINATE_SCALE,
        PLACE_BASE_LONGITUDE + x * PLACE_COORDINATE_SCALE,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

/// A place with its name and description resolved for one language
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub floor: String,
    pub zone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub image_url: Option<String>,
    pub coordinates: Coordinates,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// An outgoing connection seen from its origin place
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPlace {
    pub id: i64,
    pub name: String,
    pub distance: f64,
    pub orientation: Orientation,
    pub orientation_label: String,
    pub landmark: Option<String>,
    pub description: String,
    pub image_url: Option<String>,
}

/// Input for [`Database::create_place`]
#[derive(Debug, Clone, Default)]
pub struct NewPlace {
    pub slug: String,
    pub floor: String,
    pub zone: String,
    pub kind: Option<String>,
    pub x: f64,
    pub y: f64,
    pub image_url: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Creation language; the default language when omitted
    pub language: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, FromRow)]
struct PlaceRow {
    id: i64,
    slug: String,
    floor: String,
    zone: String,
    #[sqlx(rename = "type")]
    kind: String,
    x: f64,
    y: f64,
    image_url: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl PlaceRow {
    fn into_summary(self, text: LocalizedText) -> PlaceSummary {
        PlaceSummary {
            id: self.id,
            slug: self.slug,
            name: text.name,
            description: text.description,
            floor: self.floor,
            zone: self.zone,
            kind: self.kind,
            image_url: self.image_url,
            coordinates: Coordinates {
                x: self.x,
                y: self.y,
            },
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, FromRow)]
struct NeighborRow {
    to_place_id: i64,
    slug: String,
    image_url: Option<String>,
    distance: f64,
    orientation: Orientation,
    landmark: Option<String>,
}

const PLACE_COLUMNS: &str =
    "id, slug, floor, zone, type, x, y, image_url, latitude, longitude";

impl Database {
    /// Create a place together with its initial translations.
    ///
    /// The creation-language translation uses `name` (or the slug when
    /// absent). When that language is not English an English row named
    /// after the slug is written too. All rows commit together.
    pub async fn create_place(&self, input: NewPlace) -> Result<PlaceSummary> {
        let slug = input.slug.trim().to_string();
        let floor = input.floor.trim();
        let zone = input.zone.trim();
        let kind = input
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(DEFAULT_PLACE_TYPE);

        if slug.is_empty() || floor.is_empty() || zone.is_empty() {
            return Err(WayfindingError::validation(
                "Slug, floor, and zone are required to create a place.",
            ));
        }
        if !input.x.is_finite() || !input.y.is_finite() {
            return Err(WayfindingError::validation(
                "Coordinates must be valid numbers.",
            ));
        }

        let language = match input.language.as_deref().map(normalize_language) {
            Some(code) if !code.is_empty() => code,
            _ => self.default_language_code().await?,
        };
        let (derived_lat, derived_lon) = derive_geo(input.x, input.y);
        let latitude = input.latitude.filter(|v| v.is_finite()).unwrap_or(derived_lat);
        let longitude = input.longitude.filter(|v| v.is_finite()).unwrap_or(derived_lon);
        let image_url = input
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(slug.as_str())
            .to_string();
        let description = input.description.as_deref().unwrap_or("").trim().to_string();

        let mut tx = self.begin_write().await?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM places WHERE slug = ?1")
            .bind(&slug)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(WayfindingError::conflict(
                "A place with this slug already exists.",
            ));
        }

        let place_id = sqlx::query(
            "INSERT INTO places (slug, floor, zone, x, y, type, image_url, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&slug)
        .bind(floor)
        .bind(zone)
        .bind(input.x)
        .bind(input.y)
        .bind(kind)
        .bind(image_url)
        .bind(latitude)
        .bind(longitude)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "A place with this slug already exists."))?
        .last_insert_rowid();

        upsert_translation(&mut *tx, &language, place_id, &name, &description).await?;
        if language != FALLBACK_LANGUAGE {
            upsert_translation(
                &mut *tx,
                FALLBACK_LANGUAGE,
                place_id,
                &slug,
                &description,
            )
            .await?;
        }

        tx.commit().await?;
        info!("Created place {} '{}' ({})", place_id, slug, language);

        self.get_place(place_id, &language)
            .await?
            .ok_or_else(|| WayfindingError::not_found("Unable to load the newly created place."))
    }

    /// One place resolved for `language`, or `None` if the id is unknown
    pub async fn get_place(&self, place_id: i64, language: &str) -> Result<Option<PlaceSummary>> {
        let row: Option<PlaceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM places WHERE id = ?1",
            PLACE_COLUMNS
        ))
        .bind(place_id)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => {
                let text = self.place_text(row.id, &row.slug, language).await?;
                Ok(Some(row.into_summary(text)))
            }
            None => Ok(None),
        }
    }

    /// Places resolved for `language`, sorted by name ignoring case.
    ///
    /// `search` keeps places whose resolved name contains it, ignoring case.
    /// `dashboard_id` keeps only that dashboard's places; an unknown
    /// dashboard yields an empty list.
    pub async fn list_places(
        &self,
        language: &str,
        search: Option<&str>,
        dashboard_id: Option<i64>,
    ) -> Result<Vec<PlaceSummary>> {
        let rows: Vec<PlaceRow> =
            sqlx::query_as(&format!("SELECT {} FROM places", PLACE_COLUMNS))
                .fetch_all(self.pool())
                .await?;
        let index = self.translation_index(language).await?;

        let members: Option<HashSet<i64>> = match dashboard_id {
            Some(id) => Some(self.dashboard_place_ids(id).await?.into_iter().collect()),
            None => None,
        };
        let needle = search
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());

        let mut places: Vec<PlaceSummary> = rows
            .into_iter()
            .filter(|row| members.as_ref().map_or(true, |ids| ids.contains(&row.id)))
            .map(|row| {
                let text = index.resolve(row.id, &row.slug);
                row.into_summary(text)
            })
            .filter(|place| {
                needle
                    .as_ref()
                    .map_or(true, |n| place.name.to_lowercase().contains(n.as_str()))
            })
            .collect();

        places.sort_by_cached_key(|place| (place.name.to_lowercase(), place.id));
        Ok(places)
    }

    /// Outgoing connections of a place, nearest first
    pub async fn list_neighbors(&self, place_id: i64, language: &str) -> Result<Vec<NearbyPlace>> {
        let rows: Vec<NeighborRow> = sqlx::query_as(
            "SELECT c.to_place_id, target.slug, target.image_url,
                    c.distance, c.orientation, c.landmark
             FROM connections c
             INNER JOIN places target ON target.id = c.to_place_id
             WHERE c.from_place_id = ?1
             ORDER BY c.distance ASC, c.id ASC",
        )
        .bind(place_id)
        .fetch_all(self.pool())
        .await?;
        let index = self.translation_index(language).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let text = index.resolve(row.to_place_id, &row.slug);
                NearbyPlace {
                    id: row.to_place_id,
                    name: text.name,
                    distance: row.distance,
                    orientation: row.orientation,
                    orientation_label: i18n::orientation_label(language, row.orientation)
                        .to_string(),
                    landmark: row.landmark,
                    description: text.description,
                    image_url: row.image_url,
                }
            })
            .collect())
    }
}
