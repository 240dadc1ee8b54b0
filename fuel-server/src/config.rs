//! Application configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::{DEFAULT_CATALOG_TTL, DEFAULT_CATALOG_URL, DEFAULT_USER_AGENT};
use crate::locator::{DEFAULT_COUNTRY, DEFAULT_NOMINATIM_URL};
use crate::ranker::RankConfig;

/// Error for an environment variable with an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {name}: {value:?} ({reason})")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

/// Where station data is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    /// CSV document over HTTP.
    Url(String),
    /// Local CSV file.
    File(PathBuf),
}

/// Everything `main` needs to assemble the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Station data source (`FUEL_CATALOG_FILE` wins over `FUEL_CATALOG_URL`).
    pub catalog: CatalogLocation,

    /// Catalog snapshot lifetime (`FUEL_CATALOG_TTL_SECS`).
    pub catalog_ttl: Duration,

    /// Optional on-disk copy of the last good catalog (`FUEL_CATALOG_CACHE_PATH`).
    pub catalog_cache_path: Option<PathBuf>,

    /// Optional extra postal table CSV (`FUEL_POSTAL_TABLE`).
    pub postal_table_path: Option<PathBuf>,

    /// Skip online geocoding (`FUEL_OFFLINE`).
    pub offline: bool,

    /// Nominatim base URL (`FUEL_NOMINATIM_URL`).
    pub nominatim_url: String,

    /// Country appended to geocoding queries (`FUEL_LOCATOR_COUNTRY`).
    pub country: String,

    /// User-Agent for outbound requests (`FUEL_USER_AGENT`).
    pub user_agent: String,

    /// Ranking limits and defaults
    /// (`FUEL_MAX_RESULTS`, `FUEL_DEFAULT_RADIUS_KM`, `FUEL_MAX_RADIUS_KM`).
    pub rank: RankConfig,

    /// Listen address (`FUEL_BIND_ADDR`).
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Read configuration from the process environment. `main` loads a
    /// `.env` file into it first, when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let catalog = match var("FUEL_CATALOG_FILE") {
            Some(path) => CatalogLocation::File(PathBuf::from(path)),
            None => CatalogLocation::Url(
                var("FUEL_CATALOG_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            ),
        };

        let defaults = RankConfig::default();
        let max_results = parse_or("FUEL_MAX_RESULTS", var("FUEL_MAX_RESULTS"), defaults.max_results)?;
        let rank = RankConfig::new(
            max_results,
            defaults.max_limit.max(max_results),
            parse_non_negative(
                "FUEL_DEFAULT_RADIUS_KM",
                var("FUEL_DEFAULT_RADIUS_KM"),
                defaults.default_radius_km,
            )?,
            parse_non_negative(
                "FUEL_MAX_RADIUS_KM",
                var("FUEL_MAX_RADIUS_KM"),
                defaults.max_radius_km,
            )?,
        );
        if rank.default_radius_km > rank.max_radius_km {
            return Err(ConfigError {
                name: "FUEL_DEFAULT_RADIUS_KM",
                value: rank.default_radius_km.to_string(),
                reason: format!("must not exceed the maximum radius of {} km", rank.max_radius_km),
            });
        }

        let ttl_secs = parse_or(
            "FUEL_CATALOG_TTL_SECS",
            var("FUEL_CATALOG_TTL_SECS"),
            DEFAULT_CATALOG_TTL.as_secs(),
        )?;
        if ttl_secs == 0 {
            return Err(ConfigError {
                name: "FUEL_CATALOG_TTL_SECS",
                value: "0".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }

        Ok(Self {
            catalog,
            catalog_ttl: Duration::from_secs(ttl_secs),
            catalog_cache_path: var("FUEL_CATALOG_CACHE_PATH").map(PathBuf::from),
            postal_table_path: var("FUEL_POSTAL_TABLE").map(PathBuf::from),
            offline: parse_or("FUEL_OFFLINE", var("FUEL_OFFLINE"), false)?,
            nominatim_url: var("FUEL_NOMINATIM_URL")
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_string()),
            country: var("FUEL_LOCATOR_COUNTRY").unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            user_agent: var("FUEL_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            rank,
            bind_addr: parse_or(
                "FUEL_BIND_ADDR",
                var("FUEL_BIND_ADDR"),
                SocketAddr::from(([127, 0, 0, 1], 3000)),
            )?,
        })
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError {
            name,
            value: v.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_non_negative(
    name: &'static str,
    value: Option<String>,
    default: f64,
) -> Result<f64, ConfigError> {
    let raw = value.clone();
    let parsed = parse_or(name, value, default)?;
    if parsed.is_finite() && parsed >= 0.0 {
        Ok(parsed)
    } else {
        Err(ConfigError {
            name,
            value: raw.unwrap_or_default(),
            reason: "must be a non-negative number".to_string(),
        })
    }
}
