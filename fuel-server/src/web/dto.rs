//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSnapshot;
use crate::domain::{Coordinates, FuelKind};
use crate::ranker::RankedResult;

use super::maps::{directions_url, format_distance, format_price};

/// Message shown when a search matches nothing.
pub const NO_RESULTS_MESSAGE: &str = "No stations within radius.";

/// Query string for `/search`.
///
/// Every field is kept as text: HTML forms submit empty strings for
/// untouched inputs, which count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Fuel kind (`gasoline95`, `gas95` or `diesel`; defaults to gasoline 95)
    pub fuel: Option<String>,

    /// Postal code to search from
    pub zip: Option<String>,

    /// Place name to search from
    pub place: Option<String>,

    /// Device latitude (needs `lng`)
    pub lat: Option<String>,

    /// Device longitude (needs `lat`)
    pub lng: Option<String>,

    /// Search radius in km
    pub radius: Option<String>,

    /// Maximum number of results
    pub limit: Option<String>,
}

/// Results of a station search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Fuel kind the results are ranked by
    pub fuel: FuelKind,

    /// Resolved search origin
    pub origin: Coordinates,

    /// Radius actually searched (after clamping)
    pub radius_km: f64,

    /// When the catalog was loaded
    pub updated_at: DateTime<Utc>,

    /// Stations that matched before the result limit was applied
    pub total_matches: usize,

    /// Ranked stations, cheapest first
    pub results: Vec<StationResult>,

    /// Informational message, e.g. when nothing matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Pins for drawing the results on a map
    pub map: MapView,
}

/// A station in search results.
#[derive(Debug, Serialize)]
pub struct StationResult {
    /// Station name
    pub name: String,

    /// Town or city
    pub locality: String,

    /// Opening hours as published
    pub hours: String,

    /// Station latitude
    pub lat: f64,

    /// Station longitude
    pub lng: f64,

    /// Price of the searched fuel (€/l)
    pub price: f64,

    /// Price formatted for display, e.g. "1.459 €"
    pub price_display: String,

    /// Distance from the origin
    pub distance_km: f64,

    /// Distance formatted for display, e.g. "3.2 km"
    pub distance_display: String,

    /// Google Maps driving directions
    pub directions_url: String,
}

/// Map data: the origin plus one pin per result.
#[derive(Debug, Serialize)]
pub struct MapView {
    /// Where the search started
    pub origin: MapPin,

    /// Result pins in rank order
    pub pins: Vec<MapPin>,
}

/// A labelled point on the map.
#[derive(Debug, Clone, Serialize)]
pub struct MapPin {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

/// Catalog status for `/api/stations/count`.
#[derive(Debug, Serialize)]
pub struct CatalogStatusResponse {
    /// Number of stations in the current snapshot
    pub stations: usize,

    /// When the snapshot was loaded
    pub updated_at: DateTime<Utc>,

    /// Where the data comes from
    pub source: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationResult {
    /// Create from a ranked search result.
    pub fn from_ranked(result: &RankedResult<'_>) -> Self {
        let coordinates = result.station.coordinates;
        Self {
            name: result.station.name.clone(),
            locality: result.station.locality.clone(),
            hours: result.station.hours.clone(),
            lat: coordinates.lat(),
            lng: coordinates.lon(),
            price: result.price,
            price_display: format_price(result.price),
            distance_km: result.distance_km,
            distance_display: format_distance(result.distance_km),
            directions_url: directions_url(coordinates),
        }
    }
}

impl MapPin {
    /// Create a pin at `coordinates`.
    pub fn new(coordinates: Coordinates, label: impl Into<String>) -> Self {
        Self {
            lat: coordinates.lat(),
            lng: coordinates.lon(),
            label: label.into(),
        }
    }
}

impl MapView {
    /// Create map data for ranked results around `origin`.
    pub fn from_ranked(origin: Coordinates, results: &[RankedResult<'_>]) -> Self {
        let pins = results
            .iter()
            .map(|r| {
                MapPin::new(
                    r.station.coordinates,
                    format!("{} ({})", r.station.name, format_price(r.price)),
                )
            })
            .collect();

        Self {
            origin: MapPin::new(origin, "You"),
            pins,
        }
    }
}

impl SearchResponse {
    /// Create from ranked results.
    pub fn from_ranked(
        fuel: FuelKind,
        origin: Coordinates,
        radius_km: f64,
        snapshot: &CatalogSnapshot,
        total_matches: usize,
        results: &[RankedResult<'_>],
    ) -> Self {
        Self {
            fuel,
            origin,
            radius_km,
            updated_at: snapshot.fetched_at(),
            total_matches,
            results: results.iter().map(StationResult::from_ranked).collect(),
            message: results.is_empty().then(|| NO_RESULTS_MESSAGE.to_string()),
            map: MapView::from_ranked(origin, results),
        }
    }
}
