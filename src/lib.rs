pub mod config;
pub mod connections;
pub mod dashboards;
pub mod db;
pub mod directions;
pub mod error;
pub mod http;
pub mod i18n;
pub mod languages;
pub mod orientation;
pub mod places;
pub mod security;
pub mod translations;

pub use db::Database;
pub use error::{Result, WayfindingError};
