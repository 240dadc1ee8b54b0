//! Disk-based cache for the last good catalog.
//!
//! Lets the server start with data when the remote sheet is unreachable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::StationRecord;

use super::error::CatalogError;
use super::snapshot::CatalogSnapshot;

/// Default cache TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached catalog with metadata.
#[derive(Debug, Serialize, Deserialize)]
struct CachedCatalog {
    /// When the cached data was fetched from its source.
    fetched_at: DateTime<Utc>,
    /// The cached stations.
    stations: Vec<StationRecord>,
}

/// Configuration for the catalog disk cache.
#[derive(Debug, Clone)]
pub struct CatalogDiskCacheConfig {
    /// Path to the cache file.
    pub path: PathBuf,
    /// How long the cache remains valid.
    pub ttl: Duration,
}

impl CatalogDiskCacheConfig {
    /// Create a new cache config with the given path and default TTL (24 hours).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Disk cache for catalog snapshots.
#[derive(Debug, Clone)]
pub struct CatalogDiskCache {
    config: CatalogDiskCacheConfig,
}

impl CatalogDiskCache {
    /// Create a new disk cache with the given config.
    pub fn new(config: CatalogDiskCacheConfig) -> Self {
        Self { config }
    }

    /// Try to load a snapshot from the cache.
    ///
    /// Returns `None` if the cache doesn't exist, is invalid, or has expired.
    pub fn load(&self) -> Option<CatalogSnapshot> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let cached: CachedCatalog = serde_json::from_str(&contents).ok()?;

        let age = Utc::now()
            .signed_duration_since(cached.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if age >= self.config.ttl {
            return None;
        }

        Some(CatalogSnapshot::new(cached.stations, cached.fetched_at))
    }

    /// Save a snapshot to the cache.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, snapshot: &CatalogSnapshot) -> Result<(), CatalogError> {
        let cached = CachedCatalog {
            fetched_at: snapshot.fetched_at(),
            stations: snapshot.stations().to_vec(),
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::Cache {
                message: format!("failed to create cache directory: {}", e),
            })?;
        }

        let json = serde_json::to_string(&cached).map_err(|e| CatalogError::Cache {
            message: format!("failed to serialize cache: {}", e),
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| CatalogError::Cache {
            message: format!("failed to write cache file: {}", e),
        })?;

        Ok(())
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the cache TTL.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, FuelPrices};
    use tempfile::tempdir;

    fn snapshot() -> CatalogSnapshot {
        let stations = vec![
            StationRecord::new(
                "Repsol",
                "Albacete",
                FuelPrices::new(Some(1.459), Some(1.389)),
                Coordinates::new(38.99, -1.85).unwrap(),
                "24h",
            ),
            StationRecord::new(
                "Cepsa",
                "Madrid",
                FuelPrices::new(Some(1.499), None),
                Coordinates::new(40.41, -3.70).unwrap(),
                "",
            ),
        ];
        CatalogSnapshot::new(stations, Utc::now())
    }

    #[test]
    fn save_and_load_cache() {
        let dir = tempdir().unwrap();
        let cache = CatalogDiskCache::new(CatalogDiskCacheConfig::new(dir.path().join("c.json")));
        let original = snapshot();

        cache.save(&original).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.stations(), original.stations());
        assert_eq!(loaded.fetched_at(), original.fetched_at());
    }

    #[test]
    fn expired_cache_returns_none() {
        let dir = tempdir().unwrap();
        let config =
            CatalogDiskCacheConfig::new(dir.path().join("c.json")).with_ttl(Duration::from_secs(0));
        let cache = CatalogDiskCache::new(config);

        cache.save(&snapshot()).unwrap();

        // With 0 TTL, cache should immediately be expired
        assert!(cache.load().is_none());
    }

    #[test]
    fn missing_cache_returns_none() {
        let cache = CatalogDiskCache::new(CatalogDiskCacheConfig::new("/nonexistent/catalog.json"));

        assert!(cache.load().is_none());
    }

    #[test]
    fn corrupt_cache_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.json");
        std::fs::write(&path, "{not json").unwrap();
        let cache = CatalogDiskCache::new(CatalogDiskCacheConfig::new(&path));

        assert!(cache.load().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("c.json");
        let cache = CatalogDiskCache::new(CatalogDiskCacheConfig::new(&path));

        cache.save(&snapshot()).unwrap();

        assert!(path.exists());
        assert_eq!(cache.path(), path);
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }
}
