//! Location requests.

use std::fmt;

use crate::domain::Coordinates;

/// What the user gave us to search from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocateRequest {
    /// A postal code, e.g. `02001`.
    PostalCode(String),

    /// A picked city or free-text place name.
    Place(String),

    /// A position reported by the user's device.
    Device(Coordinates),
}

impl LocateRequest {
    /// The normalised lookup text, or `None` for device positions.
    pub fn query_text(&self) -> Option<String> {
        match self {
            LocateRequest::PostalCode(text) | LocateRequest::Place(text) => {
                Some(normalize_query(text))
            }
            LocateRequest::Device(_) => None,
        }
    }

    /// Key for remembering a resolved text lookup. Postal codes and
    /// places live in separate namespaces.
    pub fn cache_key(&self) -> Option<String> {
        match self {
            LocateRequest::PostalCode(text) => Some(format!("postal:{}", normalize_query(text))),
            LocateRequest::Place(text) => Some(format!("place:{}", normalize_query(text))),
            LocateRequest::Device(_) => None,
        }
    }
}

impl fmt::Display for LocateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateRequest::PostalCode(code) => write!(f, "postal code {}", code.trim()),
            LocateRequest::Place(place) => write!(f, "place {}", place.trim()),
            LocateRequest::Device(coords) => write!(f, "device position {coords}"),
        }
    }
}

/// Normalise free text for lookup: trim, collapse whitespace, lowercase.
pub fn normalize_query(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
