//! Immutable catalog snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::StationRecord;

/// The station list as of one successful load.
///
/// Snapshots are never modified after construction. Searches hold an
/// `Arc<CatalogSnapshot>` for their whole duration, so a concurrent
/// refresh can never expose a half-updated list.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    stations: Arc<[StationRecord]>,
    fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    /// Create a snapshot of `stations` loaded at `fetched_at`.
    pub fn new(stations: Vec<StationRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            stations: stations.into(),
            fetched_at,
        }
    }

    /// The stations in catalog order.
    pub fn stations(&self) -> &[StationRecord] {
        &self.stations
    }

    /// When the data was loaded from its source.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Load time formatted for display, e.g. `2026-03-15 10:30 UTC`.
    pub fn fetched_at_display(&self) -> String {
        self.fetched_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the snapshot holds no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
