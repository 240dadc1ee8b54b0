//! Fuel kinds and per-kind prices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unrecognised fuel kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fuel kind: {0:?} (expected gasoline95 or diesel)")]
pub struct UnknownFuelKind(pub String);

/// The fuel a search ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelKind {
    #[serde(rename = "gasoline95", alias = "gas95")]
    Gasoline95,
    #[serde(rename = "diesel")]
    Diesel,
}

impl FuelKind {
    /// Every fuel kind, in display order.
    pub const ALL: [FuelKind; 2] = [FuelKind::Gasoline95, FuelKind::Diesel];

    /// Parse a fuel kind, case-insensitively.
    ///
    /// Accepts `gasoline95`, `gas95` and `diesel`.
    pub fn parse(s: &str) -> Result<Self, UnknownFuelKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gasoline95" | "gas95" => Ok(FuelKind::Gasoline95),
            "diesel" => Ok(FuelKind::Diesel),
            _ => Err(UnknownFuelKind(s.to_string())),
        }
    }

    /// Wire name of the fuel kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelKind::Gasoline95 => "gasoline95",
            FuelKind::Diesel => "diesel",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FuelKind::Gasoline95 => "Gasoline 95",
            FuelKind::Diesel => "Diesel",
        }
    }
}

impl FromStr for FuelKind {
    type Err = UnknownFuelKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelKind::parse(s)
    }
}

impl fmt::Display for FuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prices per fuel kind, in currency units per litre.
///
/// Values are stored as supplied by the catalog. Use
/// [`StationRecord::price`](super::StationRecord::price) to get a price
/// that is safe to rank on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelPrices {
    pub gasoline95: Option<f64>,
    pub diesel: Option<f64>,
}

impl FuelPrices {
    /// Create a price set.
    pub fn new(gasoline95: Option<f64>, diesel: Option<f64>) -> Self {
        Self { gasoline95, diesel }
    }

    /// The stored price for a fuel kind, if any.
    pub fn get(&self, kind: FuelKind) -> Option<f64> {
        match kind {
            FuelKind::Gasoline95 => self.gasoline95,
            FuelKind::Diesel => self.diesel,
        }
    }
}
