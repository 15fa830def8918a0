//! JSON HTTP surface over the wayfinding core.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::config::Config;
use crate::db::Database;
use crate::directions::DirectionsResult;
use crate::error::{Result, WayfindingError};
use crate::orientation::Orientation;
use crate::places::NewPlace;
use crate::security::validate_admin_pin;
use crate::translations::{normalize_language, FALLBACK_LANGUAGE};

pub const ADMIN_PIN_HEADER: &str = "x-admin-pin";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/places", post(admin_create_place))
        .route("/connections", post(admin_create_connection))
        .route("/dashboards", post(admin_create_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_pin,
        ))
        // The PIN check itself travels in the body
        .route("/auth", post(admin_auth));

    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages).post(add_language))
        .route("/api/places", get(list_places))
        .route("/api/places/:id/neighbors", get(list_neighbors))
        .route("/api/places/:id/dashboards", get(list_place_dashboards))
        .route("/api/places/:id/translation", post(update_translation))
        .route("/api/dashboards", get(list_dashboards))
        .route("/api/directions", get(directions))
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Errors ====================

impl IntoResponse for WayfindingError {
    fn into_response(self) -> Response {
        let status = match &self {
            WayfindingError::Validation(_) => StatusCode::BAD_REQUEST,
            WayfindingError::NotFound(_) => StatusCode::NOT_FOUND,
            WayfindingError::Conflict(_) => StatusCode::CONFLICT,
            WayfindingError::RouteUnavailable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            WayfindingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &self {
            WayfindingError::Database(e) => {
                error!("Database failure: {}", e);
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };
        error_response(status, &message)
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Unwrap a JSON body, turning a malformed one into a validation error
fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| WayfindingError::validation(rejection.body_text()))
}

fn parse_id(raw: &str, what: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| WayfindingError::validation(format!("Invalid {} id.", what)))
}

fn language_or_english(language: Option<String>) -> String {
    language
        .map(|l| normalize_language(&l))
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}

/// Blank strings count as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ==================== Admin gate ====================

async fn require_admin_pin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(ADMIN_PIN_HEADER)
        .and_then(|value| value.to_str().ok());

    if validate_admin_pin(provided, &state.config.admin_pin) {
        next.run(request).await
    } else {
        warn!("Rejected admin request to {}", request.uri().path());
        error_response(StatusCode::UNAUTHORIZED, "Unauthorized.")
    }
}

#[derive(Debug, Deserialize)]
struct AuthRequest {
    pin: Option<String>,
}

async fn admin_auth(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response> {
    let request = body(payload)?;
    if validate_admin_pin(request.pin.as_deref(), &state.config.admin_pin) {
        Ok(Json(json!({ "success": true })).into_response())
    } else {
        warn!("Rejected admin PIN");
        Ok(error_response(StatusCode::UNAUTHORIZED, "Invalid PIN."))
    }
}

// ==================== Read routes ====================

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn list_languages(State(state): State<AppState>) -> Result<Json<Value>> {
    let languages = state.db.list_languages().await?;
    Ok(Json(json!({ "languages": languages })))
}

#[derive(Debug, Deserialize)]
struct AddLanguageRequest {
    code: Option<String>,
    label: Option<String>,
}

async fn add_language(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddLanguageRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let request = body(payload)?;
    let (Some(code), Some(label)) = (non_blank(request.code), non_blank(request.label)) else {
        return Err(WayfindingError::validation("code and label are required."));
    };
    state.db.add_language(&code, &label).await?;
    let languages = state.db.list_languages().await?;
    Ok(Json(json!({ "languages": languages })))
}

#[derive(Debug, Deserialize)]
struct PlacesQuery {
    language: Option<String>,
    search: Option<String>,
    #[serde(rename = "dashboardId")]
    dashboard_id: Option<String>,
}

async fn list_places(
    State(state): State<AppState>,
    Query(query): Query<PlacesQuery>,
) -> Result<Json<Value>> {
    let language = language_or_english(query.language);
    // An unparseable dashboard id is ignored rather than rejected
    let dashboard_id = query
        .dashboard_id
        .and_then(|raw| raw.trim().parse::<i64>().ok());
    let places = state
        .db
        .list_places(&language, query.search.as_deref(), dashboard_id)
        .await?;
    Ok(Json(json!({ "places": places })))
}

#[derive(Debug, Deserialize)]
struct LanguageQuery {
    language: Option<String>,
}

async fn list_neighbors(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Value>> {
    let place_id = parse_id(&id, "place")?;
    let language = language_or_english(query.language);
    let neighbors = state.db.list_neighbors(place_id, &language).await?;
    Ok(Json(json!({ "neighbors": neighbors })))
}

async fn list_place_dashboards(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let place_id = parse_id(&id, "place")?;
    let dashboards = state.db.list_dashboards_containing(place_id).await?;
    Ok(Json(json!({ "dashboards": dashboards })))
}

#[derive(Debug, Deserialize)]
struct TranslationRequest {
    language: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

async fn update_translation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let place_id = parse_id(&id, "place")?;
    let request = body(payload)?;
    let (Some(language), Some(name)) = (non_blank(request.language), non_blank(request.name))
    else {
        return Err(WayfindingError::validation("language and name are required."));
    };
    state
        .db
        .update_translation(
            &language,
            place_id,
            &name,
            request.description.as_deref().unwrap_or(""),
        )
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn list_dashboards(State(state): State<AppState>) -> Result<Json<Value>> {
    let dashboards = state.db.list_dashboards().await?;
    Ok(Json(json!({ "dashboards": dashboards })))
}

#[derive(Debug, Deserialize)]
struct DirectionsQuery {
    from: Option<String>,
    to: Option<String>,
    language: Option<String>,
}

async fn directions(
    State(state): State<AppState>,
    Query(query): Query<DirectionsQuery>,
) -> Result<Json<DirectionsResult>> {
    let (Some(from), Some(to)) = (non_blank(query.from), non_blank(query.to)) else {
        return Err(WayfindingError::validation(
            "from and to parameters are required.",
        ));
    };
    let (Ok(from_id), Ok(to_id)) = (from.trim().parse::<i64>(), to.trim().parse::<i64>()) else {
        return Err(WayfindingError::validation(
            "from and to must be valid numeric identifiers.",
        ));
    };
    let language = language_or_english(query.language);
    let result = state.db.compute_directions(from_id, to_id, &language).await?;
    Ok(Json(result))
}

// ==================== Admin routes ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePlaceRequest {
    slug: Option<String>,
    floor: Option<String>,
    zone: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    name: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    language: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

async fn admin_create_place(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreatePlaceRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let request = body(payload)?;
    let (Some(x), Some(y)) = (request.x, request.y) else {
        return Err(WayfindingError::validation(
            "Coordinates must be valid numbers.",
        ));
    };
    let language = match non_blank(request.language) {
        Some(code) => normalize_language(&code),
        None => state.db.default_language_code().await?,
    };

    let place = state
        .db
        .create_place(NewPlace {
            slug: request.slug.unwrap_or_default(),
            floor: request.floor.unwrap_or_default(),
            zone: request.zone.unwrap_or_default(),
            kind: request.kind,
            x,
            y,
            image_url: request.image_url,
            name: request.name,
            description: request.description,
            language: Some(language.clone()),
            latitude: request.latitude,
            longitude: request.longitude,
        })
        .await?;
    let places = state.db.list_places(&language, None, None).await?;
    Ok(Json(json!({ "place": place, "places": places })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateConnectionRequest {
    from_id: Option<i64>,
    to_id: Option<i64>,
    orientation: Option<String>,
    distance: Option<f64>,
    landmark: Option<String>,
    bidirectional: Option<bool>,
    language: Option<String>,
}

async fn admin_create_connection(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateConnectionRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let request = body(payload)?;
    let (Some(from_id), Some(to_id)) = (request.from_id, request.to_id) else {
        return Err(WayfindingError::validation("fromId and toId are required."));
    };
    let orientation: Orientation = request
        .orientation
        .as_deref()
        .ok_or_else(|| WayfindingError::validation("orientation is invalid."))?
        .parse()?;
    let distance = request
        .distance
        .ok_or_else(|| WayfindingError::validation("Distance must be a positive number."))?;
    let language = match non_blank(request.language) {
        Some(code) => normalize_language(&code),
        None => state.db.default_language_code().await?,
    };

    state
        .db
        .create_connection(
            from_id,
            to_id,
            orientation,
            distance,
            request.landmark.as_deref(),
            request.bidirectional.unwrap_or(true),
        )
        .await?;

    let from = state.db.list_neighbors(from_id, &language).await?;
    let to = state.db.list_neighbors(to_id, &language).await?;
    Ok(Json(json!({
        "success": true,
        "neighbors": { "from": from, "to": to },
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDashboardRequest {
    name: Option<String>,
    description: Option<String>,
    place_ids: Option<Vec<Value>>,
}

/// Accept ids as JSON numbers or numeric strings, dropping anything else
fn lenient_ids(values: &[Value]) -> Vec<i64> {
    values
        .iter()
        .filter_map(|value| match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}

async fn admin_create_dashboard(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateDashboardRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let request = body(payload)?;
    let place_ids = lenient_ids(request.place_ids.as_deref().unwrap_or(&[]));
    let dashboard = state
        .db
        .create_dashboard(
            request.name.as_deref().unwrap_or(""),
            request.description.as_deref(),
            &place_ids,
        )
        .await?;
    Ok(Json(json!({ "dashboard": dashboard })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (WayfindingError::validation("bad"), StatusCode::BAD_REQUEST),
            (WayfindingError::not_found("gone"), StatusCode::NOT_FOUND),
            (WayfindingError::conflict("dup"), StatusCode::CONFLICT),
            (
                WayfindingError::RouteUnavailable { from: 1, to: 2 },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                WayfindingError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_lenient_ids() {
        let values = vec![json!(3), json!(" 7 "), json!("x"), json!(null), json!(2.5), json!(-1)];
        assert_eq!(lenient_ids(&values), vec![3, 7, -1]);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(" 12 ", "place").unwrap(), 12);
        assert!(matches!(
            parse_id("abc", "place"),
            Err(WayfindingError::Validation(_))
        ));
    }

    #[test]
    fn test_language_or_english() {
        assert_eq!(language_or_english(None), "en");
        assert_eq!(language_or_english(Some("  ".to_string())), "en");
        assert_eq!(language_or_english(Some(" HE ".to_string())), "he");
    }
}
