//! Domain types for the fuel price finder.
//!
//! These types represent validated station data. They enforce their
//! invariants at construction time, so code that receives them (the
//! ranker in particular) can trust their validity.

mod coordinates;
mod fuel;
mod station;

pub use coordinates::{Coordinates, InvalidCoordinates};
pub use fuel::{FuelKind, FuelPrices, UnknownFuelKind};
pub use station::StationRecord;
