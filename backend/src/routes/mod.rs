//! Route definitions for the weather aggregator

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(weather_routes())
        .route("/search", get(handlers::search_cities))
}

/// Weather report and download routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(handlers::get_weather))
        .route("/weather/download", get(handlers::download_weather))
}
