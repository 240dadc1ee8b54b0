//! Geographic coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing coordinates outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("invalid coordinates ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinates {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A latitude/longitude pair in decimal degrees.
///
/// Both components are finite, latitude lies in [-90, 90] and longitude
/// in [-180, 180]. Any `Coordinates` value is valid by construction, so
/// distance calculations downstream never see NaN or out-of-range input.
///
/// # Examples
///
/// ```
/// use fuel_server::domain::Coordinates;
///
/// let albacete = Coordinates::new(38.99, -1.85).unwrap();
/// assert_eq!(albacete.lat(), 38.99);
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// assert!(Coordinates::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Validate and build a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinates> {
        let invalid = |reason| InvalidCoordinates { lat, lon, reason };

        if !lat.is_finite() || !lon.is_finite() {
            return Err(invalid("components must be finite"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }

        Ok(Self { lat, lon })
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Unvalidated wire form, checked through `Coordinates::new` on deserialize.
#[derive(Deserialize)]
struct RawCoordinates {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = InvalidCoordinates;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.lat, raw.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinates::new(90.0001, 0.0).is_err());
        assert!(Coordinates::new(-91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, 180.5).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinates::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn error_message_names_reason() {
        let err = Coordinates::new(95.0, 1.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid coordinates (95, 1): latitude must be within [-90, 90]"
        );
    }

    #[test]
    fn deserialize_validates() {
        let ok: Coordinates = serde_json::from_str(r#"{"lat": 40.4, "lon": -3.7}"#).unwrap();
        assert_eq!(ok.lon(), -3.7);

        let bad = serde_json::from_str::<Coordinates>(r#"{"lat": 400.0, "lon": -3.7}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn display() {
        let c = Coordinates::new(38.99, -1.85).unwrap();
        assert_eq!(c.to_string(), "(38.99, -1.85)");
    }
}
