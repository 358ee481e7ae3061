//! HTTP request handlers

pub mod health;
pub mod search;
pub mod weather;

pub use health::health_check;
pub use search::search_cities;
pub use weather::{download_weather, get_weather};
