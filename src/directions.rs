//! Directions Engine: hop-count route search and localized step rendering.
//!
//! The adjacency view is rebuilt from the connection table on every call.
//! Search is breadth-first, so a route minimizes the number of hops, not the
//! summed distance.

use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use crate::connections::Connection;
use crate::db::Database;
use crate::error::{Result, WayfindingError};
use crate::i18n::{self, StepParams};
use crate::orientation::Orientation;
use crate::places::PlaceSummary;
use crate::translations::normalize_language;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionStep {
    pub from_id: i64,
    pub to_id: i64,
    pub to_name: String,
    pub distance: f64,
    pub orientation: Orientation,
    pub landmark: Option<String>,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsResult {
    pub language: String,
    pub from: PlaceSummary,
    pub to: PlaceSummary,
    pub steps: Vec<DirectionStep>,
    pub total_distance: f64,
}

/// Outgoing edges per place, each list in the order the edges were supplied
#[derive(Debug, Default)]
pub struct Graph<'a> {
    adjacency: HashMap<i64, Vec<&'a Connection>>,
}

impl<'a> Graph<'a> {
    pub fn from_edges(edges: &'a [Connection]) -> Self {
        let mut adjacency: HashMap<i64, Vec<&'a Connection>> = HashMap::new();
        for edge in edges {
            adjacency.entry(edge.from_id).or_default().push(edge);
        }
        Graph { adjacency }
    }

    pub fn neighbors(&self, place_id: i64) -> &[&'a Connection] {
        self.adjacency
            .get(&place_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Fewest-hop edge sequence from `from` to `to`, or `None` if unreachable.
    ///
    /// Each place is visited at most once and remembers the edge that first
    /// reached it. Search stops as soon as `to` is dequeued.
    pub fn shortest_hop_path(&self, from: i64, to: i64) -> Option<Vec<&'a Connection>> {
        if from == to {
            return Some(Vec::new());
        }

        let mut queue = VecDeque::from([from]);
        let mut visited = HashSet::from([from]);
        let mut previous: HashMap<i64, &'a Connection> = HashMap::new();

        while let Some(current) = queue.pop_front() {
            if current == to {
                break;
            }
            for edge in self.neighbors(current) {
                if visited.insert(edge.to_id) {
                    previous.insert(edge.to_id, *edge);
                    queue.push_back(edge.to_id);
                }
            }
        }
        debug!("Route search {} -> {} visited {} places", from, to, visited.len());

        let mut path = Vec::new();
        let mut cursor = to;
        while cursor != from {
            let edge = previous.get(&cursor)?;
            path.push(*edge);
            cursor = edge.from_id;
        }
        path.reverse();
        Some(path)
    }
}

impl Database {
    /// Compute a route between two places with localized instructions
    pub async fn compute_directions(
        &self,
        from_id: i64,
        to_id: i64,
        language: &str,
    ) -> Result<DirectionsResult> {
        let language = normalize_language(language);
        let from = self.get_place(from_id, &language).await?.ok_or_else(|| {
            WayfindingError::not_found(format!("Place {} could not be found.", from_id))
        })?;
        let to = self.get_place(to_id, &language).await?.ok_or_else(|| {
            WayfindingError::not_found(format!("Place {} could not be found.", to_id))
        })?;

        if from_id == to_id {
            return Ok(DirectionsResult {
                language,
                from,
                to,
                steps: Vec::new(),
                total_distance: 0.0,
            });
        }

        let edges = self.list_edges().await?;
        let graph = Graph::from_edges(&edges);
        let path = graph
            .shortest_hop_path(from_id, to_id)
            .ok_or(WayfindingError::RouteUnavailable {
                from: from_id,
                to: to_id,
            })?;

        let mut steps = Vec::with_capacity(path.len());
        for edge in path {
            let to_name = self.resolve_translation(edge.to_id, &language).await?.name;
            let instruction = i18n::format_direction_step(
                &language,
                &StepParams {
                    destination: &to_name,
                    distance: edge.distance,
                    orientation: edge.orientation,
                    landmark: edge.landmark.as_deref(),
                },
            );
            steps.push(DirectionStep {
                from_id: edge.from_id,
                to_id: edge.to_id,
                to_name,
                distance: edge.distance,
                orientation: edge.orientation,
                landmark: edge.landmark.clone(),
                instruction,
            });
        }

        let total_distance: f64 = steps.iter().map(|step| step.distance).sum();
        debug!(
            "Directions {} -> {}: {} steps, {} total",
            from_id,
            to_id,
            steps.len(),
            total_distance
        );

        Ok(DirectionsResult {
            language,
            from,
            to,
            steps,
            total_distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::NewPlace;

    fn edge(from_id: i64, to_id: i64, distance: f64) -> Connection {
        Connection {
            from_id,
            to_id,
            distance,
            orientation: Orientation::North,
            landmark: None,
        }
    }

    fn hops(path: &[&Connection]) -> Vec<(i64, i64)> {
        path.iter().map(|e| (e.from_id, e.to_id)).collect()
    }

    // ==================== Graph Tests ====================

    #[test]
    fn test_path_follows_edges() {
        let edges = vec![edge(1, 2, 10.0), edge(2, 3, 10.0), edge(3, 4, 10.0)];
        let graph = Graph::from_edges(&edges);
        let path = graph.shortest_hop_path(1, 4).expect("Should find path");
        assert_eq!(hops(&path), vec![(1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_fewest_hops_beats_shorter_distance() {
        // 1 -> 4 directly is long, 1 -> 2 -> 3 -> 4 is short but has more hops
        let edges = vec![
            edge(1, 2, 1.0),
            edge(2, 3, 1.0),
            edge(3, 4, 1.0),
            edge(1, 4, 500.0),
        ];
        let graph = Graph::from_edges(&edges);
        let path = graph.shortest_hop_path(1, 4).unwrap();
        assert_eq!(hops(&path), vec![(1, 4)]);
    }

    #[test]
    fn test_ties_break_by_edge_order() {
        let edges = vec![
            edge(1, 3, 5.0),
            edge(1, 2, 5.0),
            edge(3, 4, 5.0),
            edge(2, 4, 5.0),
        ];
        let graph = Graph::from_edges(&edges);
        let path = graph.shortest_hop_path(1, 4).unwrap();
        assert_eq!(hops(&path), vec![(1, 3), (3, 4)]);
    }

    #[test]
    fn test_edges_are_directed() {
        let edges = vec![edge(1, 2, 5.0)];
        let graph = Graph::from_edges(&edges);
        assert!(graph.shortest_hop_path(1, 2).is_some());
        assert!(graph.shortest_hop_path(2, 1).is_none());
    }

    #[test]
    fn test_disconnected_graph_has_no_path() {
        let edges = vec![edge(1, 2, 5.0), edge(3, 4, 5.0)];
        let graph = Graph::from_edges(&edges);
        assert!(graph.shortest_hop_path(1, 4).is_none());
        assert!(graph.shortest_hop_path(9, 1).is_none());
    }

    #[test]
    fn test_cycles_terminate() {
        let edges = vec![edge(1, 2, 1.0), edge(2, 1, 1.0), edge(2, 3, 1.0), edge(3, 1, 1.0)];
        let graph = Graph::from_edges(&edges);
        assert!(graph.shortest_hop_path(1, 5).is_none());
        assert_eq!(hops(&graph.shortest_hop_path(1, 3).unwrap()), vec![(1, 2), (2, 3)]);
    }

    #[test]
    fn test_same_place_is_empty_path() {
        let graph = Graph::from_edges(&[]);
        assert_eq!(graph.shortest_hop_path(7, 7).unwrap().len(), 0);
    }

    // ==================== compute_directions Tests ====================

    async fn place(db: &Database, slug: &str, name: &str) -> i64 {
        db.create_place(NewPlace {
            slug: slug.to_string(),
            floor: "Ground".to_string(),
            zone: "Main".to_string(),
            name: Some(name.to_string()),
            language: Some("en".to_string()),
            ..Default::default()
        })
        .await
        .expect("Should create place")
        .id
    }

    #[tokio::test]
    async fn test_lobby_to_wing_b_and_back() {
        let db = Database::connect_in_memory().await.unwrap();
        let a = place(&db, "lobby", "Main Lobby").await;
        let b = place(&db, "wing-b", "Wing B").await;
        db.create_connection(a, b, Orientation::West, 30.0, None, true)
            .await
            .unwrap();

        let there = db.compute_directions(a, b, "en").await.expect("Should route");
        assert_eq!(there.steps.len(), 1);
        assert_eq!(there.total_distance, 30.0);
        assert_eq!(there.steps[0].orientation, Orientation::West);
        assert_eq!(there.steps[0].to_name, "Wing B");
        assert!(there.steps[0].instruction.contains("Wing B"));
        assert_eq!(there.from.slug, "lobby");
        assert_eq!(there.to.slug, "wing-b");

        let back = db.compute_directions(b, a, "en").await.expect("Should route");
        assert_eq!(back.steps.len(), 1);
        assert_eq!(back.steps[0].orientation, Orientation::East);
        assert_eq!(back.steps[0].distance, 30.0);
        assert_eq!(back.steps[0].from_id, b);
    }

    #[tokio::test]
    async fn test_multi_step_route_sums_distance() {
        let db = Database::connect_in_memory().await.unwrap();
        let a = place(&db, "a", "Alpha").await;
        let b = place(&db, "b", "Bravo").await;
        let c = place(&db, "c", "Charlie").await;
        db.create_connection(a, b, Orientation::North, 12.5, Some("Cafe"), true)
            .await
            .unwrap();
        db.create_connection(b, c, Orientation::Up, 7.5, None, true)
            .await
            .unwrap();

        let result = db.compute_directions(a, c, "en").await.unwrap();
        assert_eq!(result.total_distance, 20.0);
        assert_eq!(
            result.steps.iter().map(|s| s.to_id).collect::<Vec<_>>(),
            vec![b, c]
        );
        assert_eq!(result.steps[1].from_id, b);
        assert!(result.steps[0].instruction.contains("passing Cafe"));
        assert!(result.steps[1].instruction.contains("Charlie"));
    }

    #[tokio::test]
    async fn test_same_location_has_no_steps() {
        let db = Database::connect_in_memory().await.unwrap();
        let a = place(&db, "a", "Alpha").await;
        for language in ["en", "he", "xx"] {
            let result = db.compute_directions(a, a, language).await.unwrap();
            assert!(result.steps.is_empty());
            assert_eq!(result.total_distance, 0.0);
        }
    }

    #[tokio::test]
    async fn test_disconnected_places_route_unavailable() {
        let db = Database::connect_in_memory().await.unwrap();
        let a = place(&db, "a", "Alpha").await;
        let b = place(&db, "b", "Bravo").await;
        let err = db.compute_directions(a, b, "en").await.unwrap_err();
        assert!(matches!(err, WayfindingError::RouteUnavailable { from, to } if from == a && to == b));
    }

    #[tokio::test]
    async fn test_unknown_place_not_found() {
        let db = Database::connect_in_memory().await.unwrap();
        let a = place(&db, "a", "Alpha").await;
        let err = db.compute_directions(a, 404, "en").await.unwrap_err();
        assert!(matches!(err, WayfindingError::NotFound(_)));
        let err = db.compute_directions(404, 404, "en").await.unwrap_err();
        assert!(matches!(err, WayfindingError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_instructions_are_localized() {
        let db = Database::connect_in_memory().await.unwrap();
        let a = place(&db, "a", "Alpha").await;
        let b = place(&db, "b", "Bravo").await;
        db.update_translation("es", b, "Bravo ES", "").await.unwrap();
        db.create_connection(a, b, Orientation::South, 9.0, None, true)
            .await
            .unwrap();

        let result = db.compute_directions(a, b, "ES").await.unwrap();
        assert_eq!(result.language, "es");
        assert_eq!(
            result.steps[0].instruction,
            "Camina 9 m hacia el sur para llegar a Bravo ES."
        );
    }

    #[tokio::test]
    async fn test_step_names_fall_back_per_place() {
        let db = Database::connect_in_memory().await.unwrap();
        let a = place(&db, "a", "Alpha").await;
        let b = place(&db, "b", "Bravo").await;
        let c = place(&db, "c", "Charlie").await;
        db.update_translation("fr", c, "Charlie FR", "").await.unwrap();
        db.create_connection(a, b, Orientation::North, 5.0, None, false)
            .await
            .unwrap();
        db.create_connection(b, c, Orientation::East, 5.0, None, false)
            .await
            .unwrap();

        let result = db.compute_directions(a, c, "fr").await.unwrap();
        let names: Vec<_> = result.steps.iter().map(|s| s.to_name.as_str()).collect();
        assert_eq!(names, vec!["Bravo", "Charlie FR"]);
        assert_eq!(result.to.name, "Charlie FR");
        assert_eq!(result.from.name, "Alpha");
    }
}
