//! Fuel station records.

use serde::{Deserialize, Serialize};

use super::{Coordinates, FuelKind, FuelPrices};

/// A fuel station as supplied by the catalog.
///
/// Records are already typed and validated when they reach the ranker:
/// coordinates are always present and in range, prices are numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Display name. Not unique.
    pub name: String,

    /// City or region label.
    pub locality: String,

    /// Price per fuel kind.
    pub prices: FuelPrices,

    /// Where the station is.
    pub coordinates: Coordinates,

    /// Free-text opening hours, passed through for display.
    pub hours: String,
}

impl StationRecord {
    /// Create a new station record.
    pub fn new(
        name: impl Into<String>,
        locality: impl Into<String>,
        prices: FuelPrices,
        coordinates: Coordinates,
        hours: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            locality: locality.into(),
            prices,
            coordinates,
            hours: hours.into(),
        }
    }

    /// The price this station charges for `kind`, if it sells it.
    ///
    /// A missing, zero, negative or non-finite price means the station
    /// does not sell that fuel (or the price is unknown), and yields `None`.
    pub fn price(&self, kind: FuelKind) -> Option<f64> {
        self.prices
            .get(kind)
            .filter(|price| price.is_finite() && *price > 0.0)
    }
}
