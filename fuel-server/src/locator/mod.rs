//! Resolving where a search starts.
//!
//! A [`Locator`] turns a postal code, place name or device position into
//! [`Coordinates`]. It tries an ordered list of [`LocatorBackend`]s (an
//! offline table first, then online geocoders) until one answers.

mod error;
mod nominatim;
mod request;
mod table;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::domain::Coordinates;

pub use error::LocatorError;
pub use nominatim::{DEFAULT_COUNTRY, DEFAULT_NOMINATIM_URL, NominatimConfig, NominatimLocator};
pub use request::{LocateRequest, normalize_query};
pub use table::{PostalTable, PostalTableBuilder, spanish_capitals};

/// One way of resolving a location.
#[async_trait]
pub trait LocatorBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Resolve `request`.
    ///
    /// `Ok(None)` means this backend does not know the location; the
    /// next backend in the chain is tried.
    async fn locate(&self, request: &LocateRequest) -> Result<Option<Coordinates>, LocatorError>;
}

/// Configuration for the locator's result cache.
#[derive(Debug, Clone)]
pub struct LocatorCacheConfig {
    /// How long a resolved location is remembered.
    pub ttl: Duration,

    /// Maximum number of remembered locations.
    pub max_capacity: u64,
}

impl Default for LocatorCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Chain of locator backends with a result cache.
///
/// Only successful text lookups are cached; "not found" is retried on
/// the next request.
pub struct Locator {
    backends: Vec<Arc<dyn LocatorBackend>>,
    cache: MokaCache<String, Coordinates>,
}

impl Locator {
    /// Create a locator with no backends.
    pub fn new(cache_config: &LocatorCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(cache_config.ttl)
            .max_capacity(cache_config.max_capacity)
            .build();

        Self {
            backends: Vec::new(),
            cache,
        }
    }

    /// Append a backend. Backends are tried in the order they are added.
    pub fn with_backend(mut self, backend: impl LocatorBackend + 'static) -> Self {
        self.backends.push(Arc::new(backend));
        self
    }

    /// Names of the configured backends, in order.
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Resolve a location.
    ///
    /// Device positions are returned as-is. Text requests go through the
    /// backends in order; a backend that errors is logged and skipped.
    /// Returns `Ok(None)` when every backend has been exhausted.
    pub async fn locate(&self, request: &LocateRequest) -> Result<Option<Coordinates>, LocatorError> {
        if let LocateRequest::Device(coordinates) = request {
            return Ok(Some(*coordinates));
        }
        if request.query_text().unwrap_or_default().is_empty() {
            return Err(LocatorError::EmptyQuery);
        }
        let key = request.cache_key().unwrap_or_default();

        if let Some(hit) = self.cache.get(&key).await {
            debug!(query = %key, "location cache hit");
            return Ok(Some(hit));
        }

        for backend in &self.backends {
            match backend.locate(request).await {
                Ok(Some(coordinates)) => {
                    debug!(query = %key, backend = backend.name(), %coordinates, "resolved location");
                    self.cache.insert(key, coordinates).await;
                    return Ok(Some(coordinates));
                }
                Ok(None) => {
                    debug!(query = %key, backend = backend.name(), "location not known to backend");
                }
                Err(e) => {
                    warn!(query = %key, backend = backend.name(), error = %e, "locator backend failed");
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that always answers the same way and counts calls.
    struct FixedBackend {
        name: &'static str,
        answer: Option<Coordinates>,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FixedBackend {
        fn new(name: &'static str, answer: Option<Coordinates>) -> Self {
            Self {
                name,
                answer,
                fail: false,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::new(name, None)
            }
        }
    }

    #[async_trait]
    impl LocatorBackend for FixedBackend {
        fn name(&self) -> &str {
            self.name
        }

        async fn locate(&self, _request: &LocateRequest) -> Result<Option<Coordinates>, LocatorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LocatorError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(self.answer)
        }
    }

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    fn zip(code: &str) -> LocateRequest {
        LocateRequest::PostalCode(code.to_string())
    }

    #[tokio::test]
    async fn device_position_bypasses_backends() {
        let backend = FixedBackend::new("never", None);
        let calls = backend.calls.clone();
        let locator = Locator::new(&LocatorCacheConfig::default()).with_backend(backend);

        let here = point(38.99, -1.85);
        let found = locator.locate(&LocateRequest::Device(here)).await.unwrap();

        assert_eq!(found, Some(here));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_answer_wins() {
        let first = FixedBackend::new("first", Some(point(1.0, 1.0)));
        let second = FixedBackend::new("second", Some(point(2.0, 2.0)));
        let second_calls = second.calls.clone();
        let locator = Locator::new(&LocatorCacheConfig::default())
            .with_backend(first)
            .with_backend(second);

        let found = locator.locate(&zip("02001")).await.unwrap();

        assert_eq!(found, Some(point(1.0, 1.0)));
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_through_unknown_and_failing_backends() {
        let locator = Locator::new(&LocatorCacheConfig::default())
            .with_backend(FixedBackend::new("offline", None))
            .with_backend(FixedBackend::failing("flaky"))
            .with_backend(FixedBackend::new("online", Some(point(3.0, 3.0))));

        let found = locator.locate(&zip("02001")).await.unwrap();

        assert_eq!(found, Some(point(3.0, 3.0)));
    }

    #[tokio::test]
    async fn exhausted_chain_is_not_found() {
        let locator = Locator::new(&LocatorCacheConfig::default())
            .with_backend(FixedBackend::new("offline", None))
            .with_backend(FixedBackend::failing("flaky"));

        assert_eq!(locator.locate(&zip("99999")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn no_backends_is_not_found() {
        let locator = Locator::new(&LocatorCacheConfig::default());

        assert_eq!(locator.locate(&zip("02001")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let locator = Locator::new(&LocatorCacheConfig::default());

        let err = locator.locate(&zip("   ")).await.unwrap_err();

        assert!(matches!(err, LocatorError::EmptyQuery));
    }

    #[tokio::test]
    async fn successful_lookups_are_cached() {
        let backend = FixedBackend::new("online", Some(point(3.0, 3.0)));
        let calls = backend.calls.clone();
        let locator = Locator::new(&LocatorCacheConfig::default()).with_backend(backend);

        locator.locate(&zip("02001")).await.unwrap();
        locator.locate(&zip(" 02001 ")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn postal_codes_and_places_are_cached_separately() {
        let backend = FixedBackend::new("online", Some(point(39.86, -4.03)));
        let calls = backend.calls.clone();
        let locator = Locator::new(&LocatorCacheConfig::default()).with_backend(backend);

        locator.locate(&zip("Toledo")).await.unwrap();
        locator
            .locate(&LocateRequest::Place("toledo".into()))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn not_found_is_not_cached() {
        let backend = FixedBackend::new("offline", None);
        let calls = backend.calls.clone();
        let locator = Locator::new(&LocatorCacheConfig::default()).with_backend(backend);

        locator.locate(&zip("99999")).await.unwrap();
        locator.locate(&zip("99999")).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn backend_order() {
        let locator = Locator::new(&LocatorCacheConfig::default())
            .with_backend(spanish_capitals())
            .with_backend(FixedBackend::new("online", None));

        assert_eq!(locator.backend_names(), ["postal-table", "online"]);
    }
}
