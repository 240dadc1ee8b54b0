//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::StationCatalog;
use crate::locator::Locator;
use crate::ranker::RankConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Self-refreshing station catalog
    pub catalog: StationCatalog,

    /// Resolves postal codes and places to coordinates
    pub locator: Arc<Locator>,

    /// Ranking limits and defaults
    pub config: Arc<RankConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(catalog: StationCatalog, locator: Locator, config: RankConfig) -> Self {
        Self {
            catalog,
            locator: Arc::new(locator),
            config: Arc::new(config),
        }
    }
}
