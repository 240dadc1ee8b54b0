//! Web layer for the fuel price finder.
//!
//! Provides the search page and HTTP endpoints for ranking nearby
//! stations by price.

mod dto;
mod maps;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use maps::{directions_url, format_distance, format_price};
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
