//! Where catalog data comes from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::StationRecord;

use super::error::CatalogError;
use super::parse::parse_catalog;

/// A source of station records.
///
/// Implementations return already-validated records; the catalog store
/// decides when to call them.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the full station list.
    async fn fetch(&self) -> Result<Vec<StationRecord>, CatalogError>;

    /// Short description for logs (URL or path).
    fn describe(&self) -> String;
}

/// A catalog read from a local CSV file.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// Read the catalog from `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The CSV file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn fetch(&self) -> Result<Vec<StationRecord>, CatalogError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_catalog(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_csv_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stations.csv");
        std::fs::write(
            &path,
            "name,city,hours,lat,lng,gas95,diesel\nRepsol,Albacete,24h,38.99,-1.85,1.459,1.389\n",
        )
        .unwrap();

        let source = FileCatalog::new(&path);
        let stations = source.fetch().await.unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Repsol");
        assert_eq!(source.describe(), path.display().to_string());
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = FileCatalog::new("/nonexistent/stations.csv");

        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, CatalogError::Io(_)));
    }
}
