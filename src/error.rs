use thiserror::Error;

/// Errors surfaced by the wayfinding core.
///
/// Every failure falls into one of four caller-visible categories, plus a
/// catch-all for the persistence layer itself.
#[derive(Debug, Error)]
pub enum WayfindingError {
    /// Malformed or missing input (empty required string, non-finite number, ...)
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation (duplicate slug, duplicate directed edge, ...)
    #[error("{0}")]
    Conflict(String),

    /// A referenced place or dashboard does not exist
    #[error("{0}")]
    NotFound(String),

    /// Both places exist but the graph has no path between them
    #[error("Route unavailable between places {from} and {to}.")]
    RouteUnavailable { from: i64, to: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl WayfindingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// Map a unique-constraint violation to a `Conflict` with the given message,
/// leaving every other database error untouched.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> WayfindingError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            WayfindingError::conflict(message)
        }
        _ => WayfindingError::Database(err),
    }
}

pub type Result<T, E = WayfindingError> = std::result::Result<T, E>;
