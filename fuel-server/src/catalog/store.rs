//! Refreshing station catalog.
//!
//! Holds the current [`CatalogSnapshot`] and reloads it from the
//! [`CatalogSource`] once it is older than the TTL. Concurrent searches
//! that find the snapshot expired share a single reload.
//!
//! When a reload fails the previous snapshot keeps being served, so a
//! flaky source degrades to slightly stale prices rather than errors.
//! The stale snapshot is held for a short retry interval, so an outage
//! costs one failed fetch per interval rather than one per search.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::cache::CatalogDiskCache;
use super::error::CatalogError;
use super::snapshot::CatalogSnapshot;
use super::source::CatalogSource;

/// Default snapshot TTL: 1 hour.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(60 * 60);

/// Default wait before retrying a failed source: 1 minute.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// A cached snapshot and how long it may be served before reloading.
#[derive(Clone)]
struct Entry {
    snapshot: Arc<CatalogSnapshot>,
    lifetime: Duration,
}

/// Expires each entry after its own lifetime.
struct EntryExpiry;

impl Expiry<(), Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &(), value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.lifetime)
    }

    fn expire_after_update(
        &self,
        _key: &(),
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.lifetime)
    }
}

/// Thread-safe, self-refreshing station catalog.
///
/// Cheap to clone; clones share the same snapshot.
#[derive(Clone)]
pub struct StationCatalog {
    source: Arc<dyn CatalogSource>,

    /// Snapshot that may be served without reloading. Single entry under
    /// the unit key: a fresh load lives for `ttl`, a stale fallback for
    /// `retry_interval`.
    fresh: MokaCache<(), Entry>,

    ttl: Duration,
    retry_interval: Duration,

    /// Most recent successful load, kept past its TTL as a fallback.
    last_good: Arc<RwLock<Option<Arc<CatalogSnapshot>>>>,

    disk: Option<CatalogDiskCache>,
}

impl StationCatalog {
    /// Create a catalog over `source` whose snapshots expire after `ttl`.
    ///
    /// Nothing is fetched until the first call to [`snapshot`](Self::snapshot)
    /// or [`refresh`](Self::refresh).
    pub fn new(source: impl CatalogSource + 'static, ttl: Duration) -> Self {
        Self {
            source: Arc::new(source),
            fresh: MokaCache::builder()
                .max_capacity(1)
                .expire_after(EntryExpiry)
                .build(),
            ttl,
            retry_interval: DEFAULT_RETRY_INTERVAL.min(ttl),
            last_good: Arc::new(RwLock::new(None)),
            disk: None,
        }
    }

    /// How long a stale snapshot is served after a failed reload before
    /// the source is tried again.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Persist every successful load to `disk`, and fall back to it when
    /// the source fails before anything has been loaded.
    pub fn with_disk_cache(mut self, disk: CatalogDiskCache) -> Self {
        self.disk = Some(disk);
        self
    }

    /// The current snapshot, reloading it first if it has expired.
    ///
    /// If the reload fails, the last good snapshot is returned instead and
    /// kept for the retry interval. Errors only when no snapshot has ever
    /// been available.
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        match self.fresh.try_get_with((), self.load()).await {
            Ok(entry) => Ok(entry.snapshot),
            Err(e) => {
                if let Some(stale) = self.fallback().await {
                    warn!(
                        error = %e,
                        fetched_at = %stale.fetched_at_display(),
                        retry_in = ?self.retry_interval,
                        "catalog reload failed, serving stale snapshot"
                    );
                    let entry = Entry {
                        snapshot: stale.clone(),
                        lifetime: self.retry_interval,
                    };
                    self.fresh.insert((), entry).await;
                    return Ok(stale);
                }
                Err(CatalogError::Unavailable(e))
            }
        }
    }

    /// Reload from the source now, regardless of the TTL.
    ///
    /// On success, replaces the current snapshot and returns the station
    /// count. On failure, the existing snapshot is preserved and the error
    /// is returned.
    pub async fn refresh(&self) -> Result<usize, CatalogError> {
        let entry = self.load().await?;
        let count = entry.snapshot.len();
        self.fresh.insert((), entry).await;
        Ok(count)
    }

    /// Expire the current snapshot so the next search reloads.
    pub async fn invalidate(&self) {
        self.fresh.invalidate(&()).await;
    }

    /// The last successfully loaded snapshot, without triggering a load.
    pub async fn last_good(&self) -> Option<Arc<CatalogSnapshot>> {
        self.last_good.read().await.clone()
    }

    /// Description of the underlying source.
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    async fn load(&self) -> Result<Entry, CatalogError> {
        let stations = self.source.fetch().await?;
        let snapshot = Arc::new(CatalogSnapshot::new(stations, Utc::now()));
        info!(
            stations = snapshot.len(),
            source = %self.source.describe(),
            "loaded station catalog"
        );

        if let Some(disk) = &self.disk
            && let Err(e) = disk.save(&snapshot)
        {
            warn!(error = %e, path = %disk.path().display(), "failed to write catalog cache");
        }

        *self.last_good.write().await = Some(snapshot.clone());
        Ok(Entry {
            snapshot,
            lifetime: self.ttl,
        })
    }

    /// Last good snapshot, or the disk copy when nothing has loaded yet.
    async fn fallback(&self) -> Option<Arc<CatalogSnapshot>> {
        if let Some(stale) = self.last_good().await {
            return Some(stale);
        }

        let from_disk = Arc::new(self.disk.as_ref()?.load()?);
        info!(
            stations = from_disk.len(),
            fetched_at = %from_disk.fetched_at_display(),
            "using catalog from disk cache"
        );
        *self.last_good.write().await = Some(from_disk.clone());
        Some(from_disk)
    }
}
