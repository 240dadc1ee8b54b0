//! Ranking configuration.

/// Configuration parameters for station ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankConfig {
    /// Number of results shown when the caller does not ask for a count.
    pub max_results: usize,

    /// Upper bound on a caller-requested result count.
    pub max_limit: usize,

    /// Search radius used when the caller does not supply one (km).
    pub default_radius_km: f64,

    /// Largest radius a caller may request (km).
    /// Larger requests are clamped to this value.
    pub max_radius_km: f64,
}

impl RankConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_results: usize,
        max_limit: usize,
        default_radius_km: f64,
        max_radius_km: f64,
    ) -> Self {
        Self {
            max_results,
            max_limit,
            default_radius_km,
            max_radius_km,
        }
    }

    /// The radius to search with for a caller-supplied value.
    ///
    /// Both the requested and the default radius are capped at
    /// `max_radius_km`. Negative and NaN values pass through unchanged;
    /// the ranker turns them into an empty result.
    pub fn effective_radius(&self, requested: Option<f64>) -> f64 {
        match requested {
            None => self.default_radius_km.min(self.max_radius_km),
            Some(r) if r.is_nan() => r,
            Some(r) => r.min(self.max_radius_km),
        }
    }

    /// The display limit for a caller-supplied value.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.max_results)
            .min(self.max_limit.max(self.max_results))
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            max_limit: 10,
            default_radius_km: 30.0,
            max_radius_km: 100.0,
        }
    }
}
