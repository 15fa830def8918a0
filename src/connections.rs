//! Connection Graph Store: directed, attributed edges between places.

use serde::Serialize;
use sqlx::FromRow;
use tracing::info;

use crate::db::Database;
use crate::error::{conflict_on_unique, Result, WayfindingError};
use crate::orientation::Orientation;

/// One directed edge
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[sqlx(rename = "from_place_id")]
    pub from_id: i64,
    #[sqlx(rename = "to_place_id")]
    pub to_id: i64,
    pub distance: f64,
    pub orientation: Orientation,
    pub landmark: Option<String>,
}

async fn edge_exists(conn: &mut sqlx::SqliteConnection, from_id: i64, to_id: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM connections WHERE from_place_id = ?1 AND to_place_id = ?2",
    )
    .bind(from_id)
    .bind(to_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(found.is_some())
}

async fn place_exists(conn: &mut sqlx::SqliteConnection, place_id: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM places WHERE id = ?1")
        .bind(place_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn insert_edge(
    conn: &mut sqlx::SqliteConnection,
    from_id: i64,
    to_id: i64,
    distance: f64,
    orientation: Orientation,
    landmark: Option<&str>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO connections (from_place_id, to_place_id, distance, orientation, landmark)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(from_id)
    .bind(to_id)
    .bind(distance)
    .bind(orientation)
    .bind(landmark)
    .execute(&mut *conn)
    .await
    .map_err(|e| conflict_on_unique(e, "A connection between these places already exists."))?;
    Ok(())
}

impl Database {
    /// Create a directed connection, plus its reverse when `bidirectional`.
    ///
    /// The reverse edge shares distance and landmark and takes the opposite
    /// orientation. It is skipped without error if it already exists; the
    /// forward edge already existing is a `Conflict`.
    pub async fn create_connection(
        &self,
        from_id: i64,
        to_id: i64,
        orientation: Orientation,
        distance: f64,
        landmark: Option<&str>,
        bidirectional: bool,
    ) -> Result<()> {
        if from_id == to_id {
            return Err(WayfindingError::validation(
                "Connections must link two different places.",
            ));
        }
        if !distance.is_finite() || distance <= 0.0 {
            return Err(WayfindingError::validation(
                "Distance must be a positive number.",
            ));
        }
        let landmark = landmark.map(str::trim).filter(|l| !l.is_empty());

        let mut tx = self.begin_write().await?;

        if !place_exists(&mut *tx, from_id).await? {
            return Err(WayfindingError::not_found(format!(
                "Origin place {} could not be found.",
                from_id
            )));
        }
        if !place_exists(&mut *tx, to_id).await? {
            return Err(WayfindingError::not_found(format!(
                "Destination place {} could not be found.",
                to_id
            )));
        }
        if edge_exists(&mut *tx, from_id, to_id).await? {
            return Err(WayfindingError::conflict(
                "A connection between these places already exists.",
            ));
        }

        insert_edge(&mut *tx, from_id, to_id, distance, orientation, landmark).await?;

        let mut reverse_created = false;
        if bidirectional && !edge_exists(&mut *tx, to_id, from_id).await? {
            insert_edge(
                &mut *tx,
                to_id,
                from_id,
                distance,
                orientation.opposite(),
                landmark,
            )
            .await?;
            reverse_created = true;
        }

        tx.commit().await?;
        info!(
            "Connected {} -> {} ({}, {}){}",
            from_id,
            to_id,
            orientation,
            distance,
            if reverse_created { " with reverse edge" } else { "" }
        );
        Ok(())
    }

    /// Every edge in insertion order
    pub async fn list_edges(&self) -> Result<Vec<Connection>> {
        let edges = sqlx::query_as(
            "SELECT from_place_id, to_place_id, distance, orientation, landmark
             FROM connections
             ORDER BY id ASC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::NewPlace;

    async fn setup(count: usize) -> (Database, Vec<i64>) {
        let db = Database::connect_in_memory().await.expect("Should open");
        let mut ids = Vec::new();
        for i in 0..count {
            let place = db
                .create_place(NewPlace {
                    slug: format!("place-{}", i),
                    floor: "Ground".to_string(),
                    zone: "Main".to_string(),
                    language: Some("en".to_string()),
                    ..Default::default()
                })
                .await
                .expect("Should create place");
            ids.push(place.id);
        }
        (db, ids)
    }

    #[tokio::test]
    async fn test_bidirectional_creates_reverse_with_opposite_orientation() {
        let (db, ids) = setup(2).await;
        db.create_connection(ids[0], ids[1], Orientation::West, 30.0, Some(" Canopy "), true)
            .await
            .expect("Should connect");

        let edges = db.list_edges().await.unwrap();
        assert_eq!(
            edges,
            vec![
                Connection {
                    from_id: ids[0],
                    to_id: ids[1],
                    distance: 30.0,
                    orientation: Orientation::West,
                    landmark: Some("Canopy".to_string()),
                },
                Connection {
                    from_id: ids[1],
                    to_id: ids[0],
                    distance: 30.0,
                    orientation: Orientation::East,
                    landmark: Some("Canopy".to_string()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_reverse_edge_for_every_orientation() {
        for orientation in Orientation::ALL {
            let (db, ids) = setup(2).await;
            db.create_connection(ids[0], ids[1], orientation, 5.0, None, true)
                .await
                .unwrap();
            let edges = db.list_edges().await.unwrap();
            assert_eq!(edges.len(), 2);
            assert_eq!(edges[1].orientation, orientation.opposite());
        }
    }

    #[tokio::test]
    async fn test_one_way_connection() {
        let (db, ids) = setup(2).await;
        db.create_connection(ids[0], ids[1], Orientation::Up, 4.0, None, false)
            .await
            .unwrap();
        let edges = db.list_edges().await.unwrap();
        assert_eq!(edges.len(), 1);
        assert!(edges[0].landmark.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_directed_edge_conflicts() {
        let (db, ids) = setup(2).await;
        db.create_connection(ids[0], ids[1], Orientation::North, 10.0, None, false)
            .await
            .unwrap();
        let err = db
            .create_connection(ids[0], ids[1], Orientation::North, 12.0, None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, WayfindingError::Conflict(_)));
        // Rolled back: no reverse edge sneaked in
        assert_eq!(db.list_edges().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_existing_reverse_edge_is_skipped() {
        let (db, ids) = setup(2).await;
        db.create_connection(ids[1], ids[0], Orientation::South, 8.0, Some("Stairs"), false)
            .await
            .unwrap();
        db.create_connection(ids[0], ids[1], Orientation::North, 10.0, None, true)
            .await
            .expect("Implicit duplicate reverse edge is not an error");

        let edges = db.list_edges().await.unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].distance, 8.0);
        assert_eq!(edges[0].landmark.as_deref(), Some("Stairs"));
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let (db, ids) = setup(2).await;

        let err = db
            .create_connection(ids[0], ids[0], Orientation::North, 10.0, None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, WayfindingError::Validation(_)));

        for distance in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let err = db
                .create_connection(ids[0], ids[1], Orientation::North, distance, None, true)
                .await
                .unwrap_err();
            assert!(matches!(err, WayfindingError::Validation(_)));
        }

        assert!(db.list_edges().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_places_not_found() {
        let (db, ids) = setup(1).await;
        let err = db
            .create_connection(ids[0], 999, Orientation::North, 10.0, None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, WayfindingError::NotFound(_)));

        let err = db
            .create_connection(999, ids[0], Orientation::North, 10.0, None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, WayfindingError::NotFound(_)));
    }
}
