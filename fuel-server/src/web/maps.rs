//! Google Maps links and display formatting for results.
//!
//! The ranker deals in raw numbers; everything a person reads or clicks
//! is produced here.

use crate::domain::Coordinates;

/// Generate a Google Maps driving directions URL to `destination`.
///
/// The origin is left to Maps, which uses the device's position.
///
/// # Example
///
/// ```ignore
/// let url = directions_url(Coordinates::new(38.99, -1.85)?);
/// // Returns: "https://www.google.com/maps/dir/?api=1&destination=38.99,-1.85"
/// ```
pub fn directions_url(destination: Coordinates) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        destination.lat(),
        destination.lon()
    )
}

/// Price in euros per litre, to three decimals: `1.459 €`.
pub fn format_price(price: f64) -> String {
    format!("{price:.3} €")
}

/// Distance to one decimal: `12.3 km`.
pub fn format_distance(distance_km: f64) -> String {
    format!("{distance_km:.1} km")
}
