//! Business logic services for the weather aggregator

pub mod export;
pub mod weather;

pub use export::ExportFormat;
pub use weather::{WeatherReport, WeatherRequest, WeatherService};
