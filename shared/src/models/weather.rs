//! Weather data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SOURCE_POWER: &str = "NASA POWER";
pub const SOURCE_GMAO: &str = "NASA GMAO";
pub const SOURCE_WORLDVIEW: &str = "NASA Worldview";
pub const SOURCE_SIMULATION: &str = "NASA Climate Simulation";

/// Two-digit weather code, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeatherCode {
    #[serde(rename = "01")]
    Clear,
    #[serde(rename = "02")]
    MostlyClear,
    #[serde(rename = "03")]
    PartlyCloudy,
    #[serde(rename = "04")]
    MostlyCloudy,
    #[serde(rename = "05")]
    Overcast,
    #[serde(rename = "06")]
    Drizzle,
    #[serde(rename = "07")]
    LightRain,
    #[serde(rename = "08")]
    Rain,
    #[serde(rename = "09")]
    HeavyRain,
    #[serde(rename = "10")]
    Thunderstorm,
    #[serde(rename = "11")]
    SevereStorm,
}

impl WeatherCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCode::Clear => "01",
            WeatherCode::MostlyClear => "02",
            WeatherCode::PartlyCloudy => "03",
            WeatherCode::MostlyCloudy => "04",
            WeatherCode::Overcast => "05",
            WeatherCode::Drizzle => "06",
            WeatherCode::LightRain => "07",
            WeatherCode::Rain => "08",
            WeatherCode::HeavyRain => "09",
            WeatherCode::Thunderstorm => "10",
            WeatherCode::SevereStorm => "11",
        }
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw weather values for one point in time or one forecast day.
///
/// Units: °C, %, m/s, mm/day, hPa, kWh/m²/day. `date` is set on forecast
/// days and left empty on the current reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub temperature: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_speed_50m: Option<f64>,
    pub precipitation: f64,
    pub pressure: f64,
    pub solar_radiation: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub conditions: String,
    pub weather_code: WeatherCode,
    pub feels_like: f64,
    pub data_quality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub source: String,
}

/// What a provider hands back to the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResult {
    pub current: WeatherSnapshot,
    pub forecast: Vec<WeatherSnapshot>,
    pub data_source: &'static str,
}
