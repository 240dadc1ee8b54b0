//! Offline postal code and place lookup.

use std::collections::HashMap;
use std::io::Read;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::parse_decimal;
use crate::domain::Coordinates;

use super::LocatorBackend;
use super::error::LocatorError;
use super::request::{LocateRequest, normalize_query};

/// One row of a postal table CSV: `postal_code,place,lat,lng`.
///
/// Either key may be empty, but not both.
#[derive(Debug, Deserialize)]
struct TableRow {
    postal_code: Option<String>,
    place: Option<String>,
    lat: String,
    lng: String,
}

/// In-memory table of postal codes and place names.
#[derive(Debug, Clone, Default)]
pub struct PostalTable {
    postal_codes: HashMap<String, Coordinates>,
    places: HashMap<String, Coordinates>,
}

impl PostalTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a postal code.
    pub fn insert_postal_code(&mut self, code: &str, coordinates: Coordinates) {
        self.postal_codes.insert(normalize_query(code), coordinates);
    }

    /// Add a place name.
    pub fn insert_place(&mut self, place: &str, coordinates: Coordinates) {
        self.places.insert(normalize_query(place), coordinates);
    }

    /// Load a table from CSV with columns `postal_code,place,lat,lng`.
    ///
    /// Rows with invalid coordinates or no key are skipped.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, LocatorError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::new();
        for row in reader.deserialize::<TableRow>() {
            let row = row?;
            let coordinates = match (parse_decimal(&row.lat), parse_decimal(&row.lng)) {
                (Some(lat), Some(lon)) => match Coordinates::new(lat, lon) {
                    Ok(c) => c,
                    Err(e) => {
                        debug!(error = %e, "skipping postal table row");
                        continue;
                    }
                },
                _ => continue,
            };

            if let Some(code) = row.postal_code.as_deref().filter(|s| !s.is_empty()) {
                table.insert_postal_code(code, coordinates);
            }
            if let Some(place) = row.place.as_deref().filter(|s| !s.is_empty()) {
                table.insert_place(place, coordinates);
            }
        }

        Ok(table)
    }

    /// Look up a postal code.
    pub fn postal_code(&self, code: &str) -> Option<Coordinates> {
        self.postal_codes.get(&normalize_query(code)).copied()
    }

    /// Look up a place name.
    pub fn place(&self, place: &str) -> Option<Coordinates> {
        self.places.get(&normalize_query(place)).copied()
    }

    /// Number of entries (postal codes plus places).
    pub fn len(&self) -> usize {
        self.postal_codes.len() + self.places.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.postal_codes.is_empty() && self.places.is_empty()
    }
}

/// Builder for creating postal tables.
///
/// Provides a fluent API; entries with invalid coordinates are ignored.
#[derive(Debug, Default)]
pub struct PostalTableBuilder {
    inner: PostalTable,
}

impl PostalTableBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a postal code and the place it belongs to.
    pub fn add(mut self, code: &str, place: &str, lat: f64, lon: f64) -> Self {
        if let Ok(coordinates) = Coordinates::new(lat, lon) {
            self.inner.insert_postal_code(code, coordinates);
            self.inner.insert_place(place, coordinates);
        }
        self
    }

    /// Build the table.
    pub fn build(self) -> PostalTable {
        self.inner
    }
}

/// Built-in table of Spanish provincial capitals.
///
/// Coordinates are city centres; postal codes are each city's first
/// district code.
pub fn spanish_capitals() -> PostalTable {
    PostalTableBuilder::new()
        .add("02001", "Albacete", 38.9943, -1.8585)
        .add("28001", "Madrid", 40.4168, -3.7038)
        .add("08001", "Barcelona", 41.3874, 2.1686)
        .add("46001", "Valencia", 39.4699, -0.3763)
        .add("41001", "Sevilla", 37.3891, -5.9845)
        .add("29001", "Málaga", 36.7213, -4.4214)
        .add("50001", "Zaragoza", 41.6488, -0.8891)
        .add("30001", "Murcia", 37.9922, -1.1307)
        .add("03001", "Alicante", 38.3452, -0.4810)
        .add("13001", "Ciudad Real", 38.9848, -3.9274)
        .add("16001", "Cuenca", 40.0704, -2.1374)
        .add("45001", "Toledo", 39.8628, -4.0273)
        .add("19001", "Guadalajara", 40.6333, -3.1667)
        .build()
}

#[async_trait]
impl LocatorBackend for PostalTable {
    fn name(&self) -> &str {
        "postal-table"
    }

    async fn locate(&self, request: &LocateRequest) -> Result<Option<Coordinates>, LocatorError> {
        Ok(match request {
            LocateRequest::PostalCode(code) => self.postal_code(code),
            LocateRequest::Place(place) => self.place(place),
            LocateRequest::Device(coordinates) => Some(*coordinates),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table() {
        let table = PostalTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.postal_code("02001").is_none());
    }

    #[test]
    fn builder_adds_code_and_place() {
        let table = PostalTableBuilder::new()
            .add("02001", "Albacete", 38.99, -1.85)
            .build();

        assert_eq!(table.len(), 2);
        assert_eq!(table.postal_code("02001").unwrap().lat(), 38.99);
        assert_eq!(table.place("albacete").unwrap().lon(), -1.85);
    }

    #[test]
    fn builder_ignores_invalid_coordinates() {
        let table = PostalTableBuilder::new()
            .add("99999", "Nowhere", 123.0, 0.0)
            .add("02001", "Albacete", 38.99, -1.85)
            .build();

        assert_eq!(table.len(), 2);
        assert!(table.postal_code("99999").is_none());
    }

    #[test]
    fn lookups_are_normalised() {
        let table = spanish_capitals();

        assert!(table.place("  CIUDAD   real ").is_some());
        assert!(table.postal_code(" 28001").is_some());
        assert!(table.place("Málaga").is_some());
    }

    #[test]
    fn loads_from_csv() {
        let csv = "postal_code,place,lat,lng\n\
                   02001,Albacete,38.9943,-1.8585\n\
                   02002,,38.99,-1.86\n\
                   ,Hellín,\"38,51\",\"-1,70\"\n\
                   99999,Bad,200,0\n";

        let table = PostalTable::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 4);
        assert!(table.postal_code("02002").is_some());
        assert_eq!(table.place("hellín").unwrap().lat(), 38.51);
        assert!(table.postal_code("99999").is_none());
    }

    #[tokio::test]
    async fn backend_lookup() {
        let table = spanish_capitals();

        let found = table
            .locate(&LocateRequest::PostalCode("02001".into()))
            .await
            .unwrap();
        assert_eq!(found, Coordinates::new(38.9943, -1.8585).ok());

        let missing = table
            .locate(&LocateRequest::Place("Atlantis".into()))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
