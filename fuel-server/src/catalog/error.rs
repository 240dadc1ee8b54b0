//! Catalog error types.

use std::sync::Arc;

/// Errors that can occur when loading the station catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Source returned an error status
    #[error("catalog source error {status}: {message}")]
    Api { status: u16, message: String },

    /// CSV could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required columns are absent from the header row
    #[error("dataset is missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Reading a local catalog file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Disk cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },

    /// No snapshot has ever been loaded and the source is failing
    #[error("catalog unavailable: {0}")]
    Unavailable(Arc<CatalogError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CatalogError::MissingColumns(vec!["diesel".into(), "lat".into()]);
        assert_eq!(err.to_string(), "dataset is missing columns: diesel, lat");

        let err = CatalogError::Api {
            status: 404,
            message: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "catalog source error 404: Not Found");

        let inner = Arc::new(CatalogError::Cache {
            message: "disk full".into(),
        });
        let err = CatalogError::Unavailable(inner);
        assert_eq!(err.to_string(), "catalog unavailable: cache error: disk full");
    }
}
