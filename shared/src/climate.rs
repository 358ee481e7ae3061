//! Synthetic climate model
//!
//! Produces plausible weather values from latitude, the desert flag and the
//! calendar. It fills gaps in provider payloads and, when every provider has
//! failed, supplies the whole report. The random components are part of the
//! model; callers should only rely on the documented bands.

use std::f64::consts::PI;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use rand::Rng;

use crate::conditions::{feels_like, generic_conditions, generic_weather_code};
use crate::models::{HistoricalSeries, ProviderResult, WeatherSnapshot, SOURCE_SIMULATION};

/// Hour used for daily forecast and history samples
pub const AFTERNOON_HOUR: u32 = 14;

pub const DEFAULT_FORECAST_DAYS: usize = 7;
pub const DEFAULT_HISTORY_SAMPLES: usize = 365;

const SIMULATED_QUALITY: &str = "Simulated (climatological model)";

/// Latitude bands shared by every non-desert range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LatitudeBand {
    Tropical,
    Subtropical,
    Temperate,
    Polar,
}

impl LatitudeBand {
    fn of(lat: f64) -> Self {
        match lat.abs() {
            a if a < 15.0 => LatitudeBand::Tropical,
            a if a < 35.0 => LatitudeBand::Subtropical,
            a if a < 55.0 => LatitudeBand::Temperate,
            _ => LatitudeBand::Polar,
        }
    }
}

// ============================================================================
// Temperature
// ============================================================================

/// Mean temperature (°C) for a month (1-12) and hour (0-23).
///
/// Deserts swing through the day; elsewhere only the season moves the value.
pub fn temperature(lat: f64, is_desert: bool, month: u32, hour: u32) -> f64 {
    let seasonal = ((month as f64 - 6.0) * PI / 6.0).sin() * 8.0;

    if is_desert {
        let base = if lat.abs() < 25.0 { 35.0 } else { 30.0 };
        let diurnal = ((hour as f64 - 12.0) * PI / 12.0).sin() * 10.0;
        return base + seasonal + diurnal;
    }

    let base = match LatitudeBand::of(lat) {
        LatitudeBand::Tropical => 28.0,
        LatitudeBand::Subtropical => 22.0,
        LatitudeBand::Temperate => 15.0,
        LatitudeBand::Polar => 5.0,
    };
    base + seasonal
}

pub fn temperature_max<R: Rng + ?Sized>(base: f64, is_desert: bool, rng: &mut R) -> f64 {
    if is_desert {
        base + 12.0 + rng.random::<f64>() * 5.0
    } else {
        base + 5.0 + rng.random::<f64>() * 3.0
    }
}

pub fn temperature_min<R: Rng + ?Sized>(base: f64, is_desert: bool, rng: &mut R) -> f64 {
    if is_desert {
        base - 15.0 - rng.random::<f64>() * 5.0
    } else {
        base - 3.0 - rng.random::<f64>() * 2.0
    }
}

// ============================================================================
// Banded Values
// ============================================================================

/// Relative humidity (%)
pub fn humidity<R: Rng + ?Sized>(lat: f64, is_desert: bool, rng: &mut R) -> f64 {
    let (low, high) = if is_desert {
        (20.0, 45.0)
    } else {
        match LatitudeBand::of(lat) {
            LatitudeBand::Tropical => (70.0, 90.0),
            LatitudeBand::Subtropical => (50.0, 75.0),
            LatitudeBand::Temperate => (55.0, 80.0),
            LatitudeBand::Polar => (60.0, 85.0),
        }
    };
    rng.random_range(low..high)
}

/// Wind speed at 2 m (m/s)
pub fn wind_speed<R: Rng + ?Sized>(lat: f64, is_desert: bool, rng: &mut R) -> f64 {
    let (low, high) = if is_desert {
        (3.5, 6.5)
    } else {
        match LatitudeBand::of(lat) {
            LatitudeBand::Tropical => (1.5, 4.0),
            LatitudeBand::Subtropical => (2.0, 5.0),
            LatitudeBand::Temperate => (3.0, 7.0),
            LatitudeBand::Polar => (4.0, 9.0),
        }
    };
    rng.random_range(low..high)
}

/// Daily precipitation (mm). Most days are dry.
pub fn precipitation<R: Rng + ?Sized>(lat: f64, is_desert: bool, rng: &mut R) -> f64 {
    let (chance, max_mm) = if is_desert {
        (0.03, 1.0)
    } else {
        match LatitudeBand::of(lat) {
            LatitudeBand::Tropical => (0.40, 15.0),
            LatitudeBand::Subtropical => (0.25, 8.0),
            LatitudeBand::Temperate => (0.30, 6.0),
            LatitudeBand::Polar => (0.20, 4.0),
        }
    };
    if rng.random_bool(chance) {
        rng.random::<f64>() * max_mm
    } else {
        0.0
    }
}

/// Cloud cover (%)
pub fn cloud_cover<R: Rng + ?Sized>(lat: f64, is_desert: bool, rng: &mut R) -> f64 {
    let (low, high) = if is_desert {
        (5.0, 25.0)
    } else {
        match LatitudeBand::of(lat) {
            LatitudeBand::Tropical => (40.0, 80.0),
            LatitudeBand::Subtropical => (20.0, 60.0),
            LatitudeBand::Temperate => (30.0, 75.0),
            LatitudeBand::Polar => (40.0, 85.0),
        }
    };
    rng.random_range(low..high)
}

/// Surface pressure (hPa)
pub fn pressure<R: Rng + ?Sized>(lat: f64, is_desert: bool, rng: &mut R) -> f64 {
    let (low, high) = if is_desert {
        (1008.0, 1018.0)
    } else {
        match LatitudeBand::of(lat) {
            LatitudeBand::Tropical => (1008.0, 1014.0),
            LatitudeBand::Subtropical => (1010.0, 1020.0),
            LatitudeBand::Temperate => (1005.0, 1025.0),
            LatitudeBand::Polar => (995.0, 1020.0),
        }
    };
    rng.random_range(low..high)
}

/// All-sky surface shortwave (kWh/m²/day)
pub fn solar_radiation<R: Rng + ?Sized>(is_desert: bool, rng: &mut R) -> f64 {
    if is_desert {
        rng.random_range(6.0..8.0)
    } else {
        rng.random_range(3.0..6.0)
    }
}

// ============================================================================
// Composite Generators
// ============================================================================

fn simulated_day<R: Rng + ?Sized>(
    lat: f64,
    is_desert: bool,
    base_temperature: f64,
    date: Option<NaiveDate>,
    rng: &mut R,
) -> WeatherSnapshot {
    let humidity = humidity(lat, is_desert, rng);
    let wind_speed = wind_speed(lat, is_desert, rng);
    let precipitation = precipitation(lat, is_desert, rng);

    WeatherSnapshot {
        date,
        temperature: base_temperature,
        temperature_max: temperature_max(base_temperature, is_desert, rng),
        temperature_min: temperature_min(base_temperature, is_desert, rng),
        humidity,
        wind_speed,
        wind_speed_50m: Some(wind_speed * 1.4),
        precipitation,
        pressure: pressure(lat, is_desert, rng),
        solar_radiation: Some(solar_radiation(is_desert, rng)),
        cloud_cover: Some(cloud_cover(lat, is_desert, rng)),
        conditions: generic_conditions(precipitation, humidity, is_desert).to_string(),
        weather_code: generic_weather_code(precipitation, humidity),
        feels_like: feels_like(base_temperature, humidity, wind_speed, is_desert),
        data_quality: SIMULATED_QUALITY.to_string(),
        confidence: None,
        source: SOURCE_SIMULATION.to_string(),
    }
}

/// Current conditions at `now`
pub fn synthetic_snapshot<R: Rng + ?Sized>(
    lat: f64,
    is_desert: bool,
    now: NaiveDateTime,
    rng: &mut R,
) -> WeatherSnapshot {
    let base = temperature(lat, is_desert, now.month(), now.hour());
    simulated_day(lat, is_desert, base, None, rng)
}

/// Consecutive daily forecasts starting at `start`
pub fn synthetic_forecast<R: Rng + ?Sized>(
    lat: f64,
    is_desert: bool,
    start: NaiveDate,
    days: usize,
    rng: &mut R,
) -> Vec<WeatherSnapshot> {
    start
        .iter_days()
        .take(days)
        .enumerate()
        .map(|(i, date)| {
            let drift = (i as f64 * PI / 3.5).sin() * 2.0;
            let base = temperature(lat, is_desert, date.month(), AFTERNOON_HOUR)
                + drift
                + rng.random_range(-1.0..1.0);
            simulated_day(lat, is_desert, base, Some(date), rng)
        })
        .collect()
}

/// Daily samples walking backward from `today`
pub fn synthetic_history<R: Rng + ?Sized>(
    lat: f64,
    is_desert: bool,
    today: NaiveDate,
    samples: usize,
    rng: &mut R,
) -> HistoricalSeries {
    let mut temperatures = Vec::with_capacity(samples);
    let mut precipitation_mm = Vec::with_capacity(samples);
    let mut wind_speeds = Vec::with_capacity(samples);

    for offset in 0..samples {
        let month = today
            .checked_sub_days(Days::new(offset as u64))
            .map(|date| date.month())
            .unwrap_or_else(|| today.month());
        temperatures.push(
            temperature(lat, is_desert, month, AFTERNOON_HOUR) + rng.random_range(-3.0..3.0),
        );
        precipitation_mm.push(precipitation(lat, is_desert, rng));
        wind_speeds.push(wind_speed(lat, is_desert, rng));
    }

    HistoricalSeries {
        temperature: Some(temperatures),
        precipitation: Some(precipitation_mm),
        wind_speed: Some(wind_speeds),
    }
}

/// A complete simulated report, used when no provider answered
pub fn synthetic_weather(lat: f64, is_desert: bool, now: NaiveDateTime, days: usize) -> ProviderResult {
    let mut rng = rand::rng();
    ProviderResult {
        current: synthetic_snapshot(lat, is_desert, now, &mut rng),
        forecast: synthetic_forecast(lat, is_desert, now.date(), days, &mut rng),
        data_source: SOURCE_SIMULATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon_in(month: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_temperature_bases() {
        // Month 6 and hour 12 zero out the seasonal and diurnal terms
        assert!((temperature(5.0, false, 6, 12) - 28.0).abs() < 1e-9);
        assert!((temperature(20.0, false, 6, 12) - 22.0).abs() < 1e-9);
        assert!((temperature(-45.0, false, 6, 12) - 15.0).abs() < 1e-9);
        assert!((temperature(70.0, false, 6, 12) - 5.0).abs() < 1e-9);
        assert!((temperature(20.0, true, 6, 12) - 35.0).abs() < 1e-9);
        assert!((temperature(28.0, true, 6, 12) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_diurnal_only_in_desert() {
        assert!((temperature(20.0, true, 6, 18) - 45.0).abs() < 1e-9);
        assert!((temperature(20.0, false, 6, 18) - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_seasonal_term() {
        // sin(3π/6) * 8 = 8 in September
        assert!((temperature(45.0, false, 9, 0) - 23.0).abs() < 1e-9);
        assert!((temperature(45.0, false, 3, 0) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_min_spread() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let hot = temperature_max(30.0, true, &mut rng);
            assert!((42.0..47.0).contains(&hot));
            let cold = temperature_min(30.0, true, &mut rng);
            assert!(cold <= 15.0 && cold > 10.0);
            let warm = temperature_max(20.0, false, &mut rng);
            assert!((25.0..28.0).contains(&warm));
            let cool = temperature_min(20.0, false, &mut rng);
            assert!(cool <= 17.0 && cool > 15.0);
        }
    }

    #[test]
    fn test_desert_bands() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            assert!((20.0..45.0).contains(&humidity(25.0, true, &mut rng)));
            assert!((3.5..6.5).contains(&wind_speed(25.0, true, &mut rng)));
            assert!((5.0..25.0).contains(&cloud_cover(25.0, true, &mut rng)));
            assert!((0.0..1.0).contains(&precipitation(25.0, true, &mut rng)));
        }
    }

    #[test]
    fn test_forecast_dates_are_consecutive() {
        let mut rng = rand::rng();
        let start = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
        let days = synthetic_forecast(51.5, false, start, DEFAULT_FORECAST_DAYS, &mut rng);

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, Some(start));
        assert_eq!(days[6].date, NaiveDate::from_ymd_opt(2025, 1, 4));
        for day in &days {
            assert!(day.temperature_max > day.temperature);
            assert!(day.temperature_min < day.temperature);
            assert_eq!(day.source, SOURCE_SIMULATION);
        }
    }

    #[test]
    fn test_history_lengths() {
        let mut rng = rand::rng();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let history = synthetic_history(10.0, false, today, DEFAULT_HISTORY_SAMPLES, &mut rng);

        assert_eq!(history.temperature.as_ref().map(Vec::len), Some(365));
        assert_eq!(history.precipitation.as_ref().map(Vec::len), Some(365));
        assert_eq!(history.wind_speed.as_ref().map(Vec::len), Some(365));
    }

    #[test]
    fn test_synthetic_weather_is_complete() {
        let result = synthetic_weather(24.0, true, noon_in(7), DEFAULT_FORECAST_DAYS);

        assert_eq!(result.data_source, "NASA Climate Simulation");
        assert_eq!(result.forecast.len(), 7);
        assert!(result.current.date.is_none());
        assert!(result.current.cloud_cover.is_some());
        assert!(!result.current.conditions.is_empty());
    }
}
