//! Compass and vertical orientations attached to connections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WayfindingError;

/// Direction of travel along a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Orientation {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Orientation {
    pub const ALL: [Orientation; 6] = [
        Orientation::North,
        Orientation::South,
        Orientation::East,
        Orientation::West,
        Orientation::Up,
        Orientation::Down,
    ];

    /// The orientation of the reverse edge.
    pub fn opposite(self) -> Orientation {
        match self {
            Orientation::North => Orientation::South,
            Orientation::South => Orientation::North,
            Orientation::East => Orientation::West,
            Orientation::West => Orientation::East,
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::North => "north",
            Orientation::South => "south",
            Orientation::East => "east",
            Orientation::West => "west",
            Orientation::Up => "up",
            Orientation::Down => "down",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = WayfindingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Orientation::ALL
            .into_iter()
            .find(|orientation| orientation.as_str() == normalized)
            .ok_or_else(|| {
                WayfindingError::validation(format!("Orientation '{}' is invalid.", value))
            })
    }
}
