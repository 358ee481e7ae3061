//! Presentation formatting for weather snapshots
//!
//! Measurements are rounded to one decimal place and humidity/cloud cover
//! become `"65%"` strings. Formatting is idempotent, so an already formatted
//! snapshot can be passed through again without drift.

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{WeatherCode, WeatherSnapshot};

/// Round half away from zero using decimal arithmetic, so 0.15 becomes 0.2
/// rather than whatever its binary approximation suggests.
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// A whole-number percentage rendered as `"65%"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(String);

impl Percent {
    pub fn from_value(value: f64) -> Self {
        Percent(format!("{}%", round_to(value, 0)))
    }

    /// Numeric part, if the string still parses
    pub fn value(&self) -> Option<f64> {
        self.without_suffix().trim().parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn without_suffix(&self) -> &str {
        self.0.trim_end_matches('%')
    }

    fn reformatted(&self) -> Self {
        match self.value() {
            Some(v) => Percent::from_value(v),
            None => self.clone(),
        }
    }
}

/// The response shape of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub temperature: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity: Percent,
    pub wind_speed: f64,
    pub wind_speed_50m: Option<f64>,
    pub precipitation: f64,
    pub pressure: f64,
    pub solar_radiation: Option<f64>,
    pub cloud_cover: Option<Percent>,
    pub conditions: String,
    pub weather_code: WeatherCode,
    pub feels_like: f64,
    pub data_quality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub source: String,
}

/// Anything that can be turned into a [`FormattedSnapshot`]
pub trait Formattable {
    fn formatted(&self) -> FormattedSnapshot;
}

fn one_dp(value: f64) -> f64 {
    round_to(value, 1)
}

impl Formattable for WeatherSnapshot {
    fn formatted(&self) -> FormattedSnapshot {
        FormattedSnapshot {
            date: self.date,
            temperature: one_dp(self.temperature),
            temperature_max: one_dp(self.temperature_max),
            temperature_min: one_dp(self.temperature_min),
            humidity: Percent::from_value(self.humidity),
            wind_speed: one_dp(self.wind_speed),
            wind_speed_50m: self.wind_speed_50m.map(one_dp),
            precipitation: one_dp(self.precipitation),
            pressure: one_dp(self.pressure),
            solar_radiation: self.solar_radiation.map(one_dp),
            cloud_cover: self.cloud_cover.map(Percent::from_value),
            conditions: self.conditions.clone(),
            weather_code: self.weather_code,
            feels_like: one_dp(self.feels_like),
            data_quality: self.data_quality.clone(),
            confidence: self.confidence.map(|c| round_to(c, 2)),
            source: self.source.clone(),
        }
    }
}

impl Formattable for FormattedSnapshot {
    fn formatted(&self) -> FormattedSnapshot {
        FormattedSnapshot {
            temperature: one_dp(self.temperature),
            temperature_max: one_dp(self.temperature_max),
            temperature_min: one_dp(self.temperature_min),
            humidity: self.humidity.reformatted(),
            wind_speed: one_dp(self.wind_speed),
            wind_speed_50m: self.wind_speed_50m.map(one_dp),
            precipitation: one_dp(self.precipitation),
            pressure: one_dp(self.pressure),
            solar_radiation: self.solar_radiation.map(one_dp),
            cloud_cover: self.cloud_cover.as_ref().map(Percent::reformatted),
            feels_like: one_dp(self.feels_like),
            confidence: self.confidence.map(|c| round_to(c, 2)),
            ..self.clone()
        }
    }
}

/// Format every day of a forecast
pub fn format_forecast<T: Formattable>(days: &[T]) -> Vec<FormattedSnapshot> {
    days.iter().map(Formattable::formatted).collect()
}
