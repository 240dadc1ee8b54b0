//! Great-circle distance.
//!
//! Uses the haversine formula in its `asin` form:
//!
//! ```text
//! a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
//! d = 2·R·asin(√a)
//! ```
//!
//! The `atan2(√a, √(1-a))` form agrees to within floating-point rounding
//! but is not bit-identical; results here are always from `asin`.

use crate::domain::Coordinates;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance in kilometres between two validated points.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    haversine_km_raw(from.lat(), from.lon(), to.lat(), to.lon())
}

/// Distance in kilometres between two points given in decimal degrees.
///
/// The intermediate `a` is clamped to [0, 1]: rounding can push it just
/// past 1 for antipodal points, which would make `asin` return NaN.
/// Non-finite input still produces NaN; use [`haversine_km`] with
/// [`Coordinates`] to rule that out.
pub fn haversine_km_raw(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinates() -> impl Strategy<Value = Coordinates> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinates::new(lat, lon).unwrap())
    }

    proptest! {
        #[test]
        fn identity(p in coordinates()) {
            prop_assert!(haversine_km(p, p).abs() < 1e-9);
        }

        #[test]
        fn symmetric(a in coordinates(), b in coordinates()) {
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            prop_assert!((ab - ba).abs() < 1e-9, "{} vs {}", ab, ba);
        }

        #[test]
        fn bounded_and_never_nan(a in coordinates(), b in coordinates()) {
            let d = haversine_km(a, b);
            prop_assert!(!d.is_nan());
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }

        /// The triangle inequality holds (up to rounding) for nearby points.
        #[test]
        fn triangle_inequality_nearby(
            lat in -60.0f64..60.0,
            lon in -170.0f64..170.0,
            offsets in prop::array::uniform4(-0.5f64..0.5),
        ) {
            let a = Coordinates::new(lat, lon).unwrap();
            let b = Coordinates::new(lat + offsets[0], lon + offsets[1]).unwrap();
            let c = Coordinates::new(lat + offsets[2], lon + offsets[3]).unwrap();
            prop_assert!(haversine_km(a, c) <= haversine_km(a, b) + haversine_km(b, c) + 1e-6);
        }
    }
}
