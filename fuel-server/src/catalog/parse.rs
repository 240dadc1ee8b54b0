//! CSV catalog parsing.
//!
//! The station sheet is published as CSV with one row per station.
//! Parsing turns it into typed [`StationRecord`]s: rows without usable
//! coordinates are dropped here, so the ranker never sees them.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{Coordinates, FuelPrices, StationRecord};

use super::error::CatalogError;

/// Columns the sheet must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = ["name", "city", "hours", "lat", "lng", "gas95", "diesel"];

/// One raw CSV row. Every cell is kept as text until validated.
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    city: String,
    hours: String,
    lat: Option<String>,
    lng: Option<String>,
    gas95: Option<String>,
    diesel: Option<String>,
}

/// Parse a catalog CSV document.
///
/// Fails only when the header row is unreadable or lacks a required
/// column. Individual malformed rows are skipped.
pub fn parse_catalog(text: &str) -> Result<Vec<StationRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?;
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| (*col).to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(CatalogError::MissingColumns(missing));
    }

    let mut stations = Vec::new();
    let mut dropped = 0usize;

    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed catalog row");
                dropped += 1;
                continue;
            }
        };

        match row_to_record(row) {
            Some(record) => stations.push(record),
            None => {
                debug!(line, "skipping catalog row without valid coordinates");
                dropped += 1;
            }
        }
    }

    debug!(stations = stations.len(), dropped, "parsed catalog");
    Ok(stations)
}

fn row_to_record(row: CsvRow) -> Option<StationRecord> {
    let lat = row.lat.as_deref().and_then(parse_decimal)?;
    let lon = row.lng.as_deref().and_then(parse_decimal)?;
    let coordinates = Coordinates::new(lat, lon).ok()?;

    let prices = FuelPrices::new(
        row.gas95.as_deref().and_then(parse_price),
        row.diesel.as_deref().and_then(parse_price),
    );

    Some(StationRecord::new(
        row.name,
        row.city,
        prices,
        coordinates,
        row.hours,
    ))
}

/// Parse a price cell such as `1.459`, `1,459` or `1.459 €`.
///
/// Returns `None` for empty or unparseable cells. Zero and negative
/// values are kept; the record decides whether they are usable.
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches('€').trim_end();
    parse_decimal(trimmed)
}

/// Parse a decimal number that may use a comma as the decimal separator.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let value = if raw.contains(',') && !raw.contains('.') {
        raw.replace(',', ".").parse::<f64>().ok()?
    } else {
        raw.parse::<f64>().ok()?
    };

    value.is_finite().then_some(value)
}
