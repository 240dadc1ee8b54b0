//! Station ranking.
//!
//! Turns a catalog snapshot and a [`SearchQuery`] into a short list of
//! the cheapest nearby stations. Ranking is a pure function of its
//! inputs: it holds no state between calls and never mutates the catalog.

mod config;
mod distance;
mod rank;

pub use config::RankConfig;
pub use distance::{EARTH_RADIUS_KM, haversine_km, haversine_km_raw};
pub use rank::{RankedResult, SearchQuery, count_matches, rank};
