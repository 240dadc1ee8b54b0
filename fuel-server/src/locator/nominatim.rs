//! OpenStreetMap Nominatim geocoder.
//!
//! Resolves postal codes and place names through the public
//! `/search` endpoint, restricted to one country by appending it to
//! the query text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::catalog::parse_decimal;
use crate::domain::Coordinates;

use super::LocatorBackend;
use super::error::LocatorError;
use super::request::LocateRequest;

/// Default base URL for Nominatim.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default country appended to every query.
pub const DEFAULT_COUNTRY: &str = "Spain";

/// One search hit. Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Country name appended to queries
    pub country: String,
    /// User-Agent header value (required by the Nominatim usage policy)
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    /// Create a config with the given User-Agent and defaults otherwise.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            user_agent: user_agent.into(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the country queries are restricted to.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Nominatim geocoding backend.
#[derive(Debug, Clone)]
pub struct NominatimLocator {
    http: reqwest::Client,
    base_url: String,
    country: String,
}

impl NominatimLocator {
    /// Create a new Nominatim client.
    pub fn new(config: NominatimConfig) -> Result<Self, LocatorError> {
        let mut headers = HeaderMap::new();
        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| LocatorError::Api {
                status: 0,
                message: "Invalid User-Agent format".to_string(),
            })?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country: config.country,
        })
    }

    /// Geocode free text. Returns the top hit, if any.
    pub async fn search(&self, text: &str) -> Result<Option<Coordinates>, LocatorError> {
        let url = format!("{}/search", self.base_url);
        let q = format!("{},{}", text.trim(), self.country);

        let response = self
            .http
            .get(&url)
            .query(&[("q", q.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LocatorError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let places: Vec<Place> = serde_json::from_str(&body).map_err(|e| LocatorError::Json {
            message: e.to_string(),
        })?;

        let Some(place) = places.first() else {
            debug!(query = %q, "no geocoding hits");
            return Ok(None);
        };

        // A hit with unusable coordinates counts as not found
        let coordinates = parse_decimal(&place.lat)
            .zip(parse_decimal(&place.lon))
            .and_then(|(lat, lon)| Coordinates::new(lat, lon).ok());
        Ok(coordinates)
    }
}

#[async_trait]
impl LocatorBackend for NominatimLocator {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn locate(&self, request: &LocateRequest) -> Result<Option<Coordinates>, LocatorError> {
        match request {
            LocateRequest::PostalCode(text) | LocateRequest::Place(text) => self.search(text).await,
            LocateRequest::Device(coordinates) => Ok(Some(*coordinates)),
        }
    }
}
