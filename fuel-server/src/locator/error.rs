//! Locator error types.

/// Errors from resolving a location.
///
/// "Not found" is not an error; backends signal it with `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    /// The query text is empty after normalisation
    #[error("location query is empty")]
    EmptyQuery,

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Geocoding service returned an error status
    #[error("geocoder error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a geocoder response
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Failed to load a postal table
    #[error("postal table error: {0}")]
    Table(#[from] csv::Error),
}
