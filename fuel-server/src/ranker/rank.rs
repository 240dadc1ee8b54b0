//! Station ranking for search results.
//!
//! Filters a catalog snapshot down to stations that sell the requested
//! fuel within the search radius, then orders them cheapest first.

use serde::Serialize;

use crate::domain::{Coordinates, FuelKind, StationRecord};

use super::distance::haversine_km;

/// A single search, built fresh for every user interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchQuery {
    /// Point distances are measured from.
    pub origin: Coordinates,

    /// Which price filters and ranks.
    pub fuel_kind: FuelKind,

    /// Search radius in kilometres. The boundary is inclusive.
    pub radius_km: f64,
}

impl SearchQuery {
    /// Create a new search query.
    pub fn new(origin: Coordinates, fuel_kind: FuelKind, radius_km: f64) -> Self {
        Self {
            origin,
            fuel_kind,
            radius_km,
        }
    }
}

/// A station that matched a search, with its distance and selected price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult<'a> {
    /// The catalog record, unmodified.
    #[serde(flatten)]
    pub station: &'a StationRecord,

    /// Great-circle distance from the query origin.
    pub distance_km: f64,

    /// The station's price for the queried fuel kind.
    pub price: f64,
}

/// Rank stations for a query.
///
/// Stations are kept when they sell the queried fuel at a positive price
/// and lie within `radius_km` of the origin. Survivors are ordered by:
/// 1. Price (cheaper is better)
/// 2. Distance (nearer is better)
///
/// Ties on both keep catalog order. At most `limit` results are returned.
///
/// Never fails: an empty catalog, a zero radius, a negative or NaN radius,
/// or no matching stations all give an empty result.
pub fn rank<'a>(
    catalog: &'a [StationRecord],
    query: &SearchQuery,
    limit: usize,
) -> Vec<RankedResult<'a>> {
    if limit == 0 {
        return Vec::new();
    }

    let mut results: Vec<RankedResult<'a>> = matches(catalog, query).collect();

    // sort_by is stable, so full ties keep catalog order
    results.sort_by(|a, b| {
        a.price
            .total_cmp(&b.price)
            .then_with(|| a.distance_km.total_cmp(&b.distance_km))
    });
    results.truncate(limit);

    results
}

/// Number of stations that pass the filter of [`rank`], before the limit
/// is applied.
pub fn count_matches(catalog: &[StationRecord], query: &SearchQuery) -> usize {
    matches(catalog, query).count()
}

/// Stations selling the queried fuel within the radius, in catalog order.
///
/// A negative or NaN radius matches nothing: no distance compares `<=` to it.
fn matches<'a>(
    catalog: &'a [StationRecord],
    query: &SearchQuery,
) -> impl Iterator<Item = RankedResult<'a>> {
    let query = *query;
    catalog.iter().filter_map(move |station| {
        let price = station.price(query.fuel_kind)?;
        let distance_km = haversine_km(query.origin, station.coordinates);
        (distance_km <= query.radius_km).then_some(RankedResult {
            station,
            distance_km,
            price,
        })
    })
}
