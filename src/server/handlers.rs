use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::geo::{county_names, BoundingBox, GeoResolver, PlaceEntry};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn log_request(path: &str, detail: &str, outcome: &str, start: Instant) {
    eprintln!(
        "[{}] GET {}?{} -> {} ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        path,
        detail,
        outcome,
        start.elapsed().as_secs_f64() * 1000.0,
    );
}

/// Resolver calls block on the network; keep them off the async runtime.
async fn run_blocking<T, F>(resolver: Arc<GeoResolver>, f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(Arc<GeoResolver>) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(resolver))
        .await
        .map_err(|e| {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("worker failed: {}", e))
                .into_response()
        })
}

fn require_county(county: &Option<String>) -> Result<String, Response> {
    match county.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => Ok(c.to_string()),
        _ => Err(api_error(StatusCode::BAD_REQUEST, "Missing 'county' parameter").into_response()),
    }
}

// ─── GET /api/counties ───────────────────────────────────────────

#[derive(Serialize)]
pub struct CountiesResponse {
    pub counties: Vec<&'static str>,
}

pub async fn counties() -> Json<CountiesResponse> {
    Json(CountiesResponse {
        counties: county_names(),
    })
}

// ─── GET /api/bounds ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BoundsQuery {
    pub county: Option<String>,
}

#[derive(Serialize)]
pub struct BoundsResponse {
    pub county: String,
    pub bounds: BoundingBox,
}

pub async fn county_bounds(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BoundsQuery>,
) -> Result<Json<BoundsResponse>, Response> {
    let start = Instant::now();
    let county = require_county(&params.county)?;

    let lookup = county.clone();
    let bounds = run_blocking(Arc::clone(&state.resolver), move |r| {
        r.resolve_county_bounds(&lookup)
    })
    .await?;

    match bounds {
        Some(bounds) => {
            log_request("/api/bounds", &format!("county={}", county), "ok", start);
            Ok(Json(BoundsResponse { county, bounds }))
        }
        None => {
            log_request("/api/bounds", &format!("county={}", county), "absent", start);
            Err(api_error(
                StatusCode::NOT_FOUND,
                format!("No bounds found for county '{}'", county),
            )
            .into_response())
        }
    }
}

// ─── GET /api/towns ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TownsQuery {
    pub county: Option<String>,
}

#[derive(Serialize)]
pub struct PlacesResponse {
    pub county: String,
    pub count: usize,
    pub places: Vec<PlaceEntry>,
}

pub async fn towns(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TownsQuery>,
) -> Result<Json<PlacesResponse>, Response> {
    let start = Instant::now();
    let county = require_county(&params.county)?;

    let lookup = county.clone();
    let places = run_blocking(Arc::clone(&state.resolver), move |r| {
        r.list_places_in_county(&lookup)
    })
    .await?;

    log_request(
        "/api/towns",
        &format!("county={}", county),
        &format!("{} places", places.len()),
        start,
    );
    Ok(Json(PlacesResponse {
        county,
        count: places.len(),
        places,
    }))
}

// ─── GET /api/search ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub county: Option<String>,
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<PlacesResponse>, Response> {
    let start = Instant::now();
    let county = require_county(&params.county)?;
    // Empty search text is a normal, empty result, not a client error.
    let text = params.q.unwrap_or_default().trim().to_string();

    let lookup = county.clone();
    let needle = text.clone();
    let places = run_blocking(Arc::clone(&state.resolver), move |r| {
        r.search_places_in_county(&lookup, &needle)
    })
    .await?;

    log_request(
        "/api/search",
        &format!("county={}&q={}", county, text),
        &format!("{} places", places.len()),
        start,
    );
    Ok(Json(PlacesResponse {
        county,
        count: places.len(),
        places,
    }))
}
