//! HTTP API handlers for colony-server

use chrono::{DateTime, NaiveDate};
use uuid::Uuid;

use crate::ApiError;

pub mod auth;
pub mod cages;
pub mod health;
pub mod strains;

pub use auth::auth_routes;
pub use cages::cage_routes;
pub use health::health_routes;
pub use strains::strain_routes;

/// Parse a path id; malformed ids cannot name an existing record
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} {} not found", what, raw)))
}

/// Treat missing and blank strings alike
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its date
pub(crate) fn parse_wire_date(value: Option<String>, field: &str) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", field, raw)))
}
