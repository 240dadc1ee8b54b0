//! HTTP route handlers.

use std::str::FromStr;
use std::sync::Arc;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::catalog::{CatalogError, CatalogSnapshot};
use crate::domain::{Coordinates, FuelKind};
use crate::locator::{LocateRequest, LocatorError};
use crate::ranker::{RankedResult, SearchQuery, count_matches, rank};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/api/stations/count", get(catalog_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with search form.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    // Don't trigger a catalog load just to render the form
    let updated = state
        .catalog
        .last_good()
        .await
        .map(|s| s.fetched_at_display());

    let template = IndexTemplate {
        fuels: FuelOption::all(FuelKind::Gasoline95),
        default_radius: state.config.default_radius_km,
        max_radius: state.config.max_radius_km,
        updated,
    };

    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Catalog size and freshness.
async fn catalog_status(
    State(state): State<AppState>,
) -> Result<Json<CatalogStatusResponse>, AppError> {
    let snapshot = state.catalog.snapshot().await?;

    Ok(Json(CatalogStatusResponse {
        stations: snapshot.len(),
        updated_at: snapshot.fetched_at(),
        source: state.catalog.describe(),
    }))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Rank stations around a location.
async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let html = accepts_html(&headers);

    let outcome = match run_search(&state, &params).await {
        Ok(outcome) => outcome,
        Err(e) if html => return Ok(e.into_html_response()),
        Err(e) => return Err(e),
    };

    let results = outcome.ranked();
    let total_matches = outcome.total_matches();
    info!(
        fuel = %outcome.query.fuel_kind,
        origin = %outcome.query.origin,
        radius_km = outcome.query.radius_km,
        matches = total_matches,
        results = results.len(),
        "station search"
    );

    // Return HTML or JSON based on Accept header
    if html {
        let template = ResultsTemplate::from_ranked(
            outcome.query.fuel_kind,
            outcome.query.origin,
            outcome.query.radius_km,
            outcome.snapshot.fetched_at_display(),
            total_matches,
            &results,
        );
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(SearchResponse::from_ranked(
            outcome.query.fuel_kind,
            outcome.query.origin,
            outcome.query.radius_km,
            &outcome.snapshot,
            total_matches,
            &results,
        ))
        .into_response())
    }
}

/// A validated search together with the catalog it runs against.
struct SearchOutcome {
    query: SearchQuery,
    limit: usize,
    snapshot: Arc<CatalogSnapshot>,
}

impl SearchOutcome {
    fn ranked(&self) -> Vec<RankedResult<'_>> {
        rank(self.snapshot.stations(), &self.query, self.limit)
    }

    fn total_matches(&self) -> usize {
        count_matches(self.snapshot.stations(), &self.query)
    }
}

/// Validate parameters, resolve the origin and take a catalog snapshot.
///
/// The ranker is only reached once the origin is known.
async fn run_search(state: &AppState, params: &SearchParams) -> Result<SearchOutcome, AppError> {
    let fuel = match present(&params.fuel) {
        Some(text) => FuelKind::parse(text).map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => FuelKind::Gasoline95,
    };
    let radius = parse_param::<f64>("radius", &params.radius)?;
    let limit = parse_param::<usize>("limit", &params.limit)?;

    let request = locate_request(params)?;
    let origin = state
        .locator
        .locate(&request)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: format!("Could not find {request}"),
        })?;

    let snapshot = state.catalog.snapshot().await?;

    Ok(SearchOutcome {
        query: SearchQuery::new(origin, fuel, state.config.effective_radius(radius)),
        limit: state.config.effective_limit(limit),
        snapshot,
    })
}

/// Work out what to locate. A device position beats a postal code,
/// which beats a place name.
fn locate_request(params: &SearchParams) -> Result<LocateRequest, AppError> {
    match (present(&params.lat), present(&params.lng)) {
        (Some(_), Some(_)) => {
            let lat = parse_param::<f64>("lat", &params.lat)?.unwrap_or_default();
            let lng = parse_param::<f64>("lng", &params.lng)?.unwrap_or_default();
            let coordinates = Coordinates::new(lat, lng).map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })?;
            Ok(LocateRequest::Device(coordinates))
        }
        (Some(_), None) | (None, Some(_)) => Err(AppError::BadRequest {
            message: "lat and lng must be given together".to_string(),
        }),
        (None, None) => {
            if let Some(zip) = present(&params.zip) {
                Ok(LocateRequest::PostalCode(zip.to_string()))
            } else if let Some(place) = present(&params.place) {
                Ok(LocateRequest::Place(place.to_string()))
            } else {
                Err(AppError::BadRequest {
                    message: "Enter a postal code or place, or share your location".to_string(),
                })
            }
        }
    }
}

/// A query parameter with surrounding whitespace removed, if non-empty.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_param<T: FromStr>(name: &str, value: &Option<String>) -> Result<Option<T>, AppError> {
    present(value)
        .map(|v| {
            v.parse::<T>().map_err(|_| AppError::BadRequest {
                message: format!("Invalid {name}: {v}"),
            })
        })
        .transpose()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Unavailable { message }
            | AppError::Internal { message } => message,
        }
    }

    fn log(&self) {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, reason = self.message(), "request failed");
        } else {
            debug!(%status, reason = self.message(), "request rejected");
        }
    }

    /// Render as an HTML error page instead of JSON.
    pub fn into_html_response(self) -> Response {
        self.log();
        let status = self.status();
        let template = ErrorTemplate {
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.message().to_string(),
        };
        let body = template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e));
        (status, Html(body)).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Unavailable {
            message: e.to_string(),
        }
    }
}

impl From<LocatorError> for AppError {
    fn from(e: LocatorError) -> Self {
        match e {
            LocatorError::EmptyQuery => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
