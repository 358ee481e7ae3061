//! Weather aggregator backend
//!
//! Serves current conditions and a short forecast for any coordinate by
//! walking a chain of NASA data sources and falling back to a synthetic
//! climate model when every source fails.

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorCatalog};

use external::GeocodingClient;
use services::WeatherService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub errors: Arc<ErrorCatalog>,
    pub weather: WeatherService,
    pub geocoder: GeocodingClient,
}

impl AppState {
    /// Build the provider chain and geocoder from configuration
    pub fn new(config: Config, errors: ErrorCatalog) -> AppResult<Self> {
        let weather = WeatherService::from_config(&config)?;
        let geocoder = GeocodingClient::new(
            config.geocoding.url.clone(),
            config.geocoding.timeout(),
            &config.geocoding.user_agent,
        )
        .map_err(|e| AppError::Internal(format!("Failed to build geocoding client: {}", e)))?;

        Ok(Self {
            errors: Arc::new(errors),
            weather,
            geocoder,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
