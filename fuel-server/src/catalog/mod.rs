//! Station catalog loading.
//!
//! Downloads the published station sheet (CSV), validates it into typed
//! [`StationRecord`](crate::domain::StationRecord)s and keeps an immutable
//! snapshot that is reloaded once its TTL expires.

mod cache;
mod client;
mod error;
mod parse;
mod snapshot;
mod source;
mod store;

pub use cache::{CatalogDiskCache, CatalogDiskCacheConfig};
pub use client::{CatalogClient, CatalogClientConfig, DEFAULT_CATALOG_URL, DEFAULT_USER_AGENT};
pub use error::CatalogError;
pub use parse::{REQUIRED_COLUMNS, parse_catalog, parse_decimal, parse_price};
pub use snapshot::CatalogSnapshot;
pub use source::{CatalogSource, FileCatalog};
pub use store::{DEFAULT_CATALOG_TTL, StationCatalog};
