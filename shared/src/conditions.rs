//! Condition text, weather codes and apparent temperature
//!
//! There are two families of derivation. The cloud-based pair is used for
//! NASA POWER readings, which carry a cloud amount. The generic pair works
//! from humidity alone and is used for GMAO and simulated data. Their
//! thresholds differ and callers rely on that difference, so they are kept
//! apart.

use crate::models::WeatherCode;

// ============================================================================
// Condition Text
// ============================================================================

/// Condition label for readings that include cloud cover
pub fn cloud_conditions(precipitation: f64, cloud_cover: f64, humidity: f64, is_desert: bool) -> &'static str {
    if precipitation > 12.0 {
        "Thunderstorm"
    } else if precipitation > 6.0 {
        "Heavy Rain"
    } else if precipitation > 2.0 {
        "Rain"
    } else if precipitation > 0.5 {
        "Light Rain"
    } else if precipitation > 0.0 {
        "Drizzle"
    } else if cloud_cover > 85.0 {
        "Overcast"
    } else if cloud_cover > 60.0 {
        "Mostly Cloudy"
    } else if cloud_cover > 30.0 {
        "Partly Cloudy"
    } else if cloud_cover > 10.0 {
        "Mostly Clear"
    } else if is_desert && humidity < 25.0 {
        "Clear and Dry"
    } else {
        "Clear Sky"
    }
}

/// Condition label derived from precipitation and humidity only
pub fn generic_conditions(precipitation: f64, humidity: f64, is_desert: bool) -> &'static str {
    if precipitation > 12.0 {
        "Thunderstorm"
    } else if precipitation > 6.0 {
        "Heavy Rain"
    } else if precipitation > 2.0 {
        "Rain"
    } else if precipitation > 0.0 {
        "Light Rain"
    } else if humidity > 85.0 {
        "Overcast"
    } else if humidity > 75.0 {
        "Mostly Cloudy"
    } else if humidity > 60.0 {
        "Partly Cloudy"
    } else if humidity > 45.0 {
        "Mostly Clear"
    } else if is_desert && humidity < 25.0 {
        "Clear and Dry"
    } else {
        "Clear Sky"
    }
}

// ============================================================================
// Weather Codes
// ============================================================================

pub fn cloud_weather_code(precipitation: f64, cloud_cover: f64) -> WeatherCode {
    if precipitation > 20.0 {
        WeatherCode::SevereStorm
    } else if precipitation > 12.0 {
        WeatherCode::Thunderstorm
    } else if precipitation > 6.0 {
        WeatherCode::HeavyRain
    } else if precipitation > 2.0 {
        WeatherCode::Rain
    } else if precipitation > 0.5 {
        WeatherCode::LightRain
    } else if precipitation > 0.0 {
        WeatherCode::Drizzle
    } else if cloud_cover > 85.0 {
        WeatherCode::Overcast
    } else if cloud_cover > 60.0 {
        WeatherCode::MostlyCloudy
    } else if cloud_cover > 30.0 {
        WeatherCode::PartlyCloudy
    } else if cloud_cover > 10.0 {
        WeatherCode::MostlyClear
    } else {
        WeatherCode::Clear
    }
}

pub fn generic_weather_code(precipitation: f64, humidity: f64) -> WeatherCode {
    if precipitation > 15.0 {
        WeatherCode::SevereStorm
    } else if precipitation > 10.0 {
        WeatherCode::Thunderstorm
    } else if precipitation > 5.0 {
        WeatherCode::HeavyRain
    } else if precipitation > 2.0 {
        WeatherCode::Rain
    } else if precipitation > 0.5 {
        WeatherCode::LightRain
    } else if precipitation > 0.0 {
        WeatherCode::Drizzle
    } else if humidity > 85.0 {
        WeatherCode::Overcast
    } else if humidity > 75.0 {
        WeatherCode::MostlyCloudy
    } else if humidity > 60.0 {
        WeatherCode::PartlyCloudy
    } else if humidity > 45.0 {
        WeatherCode::MostlyClear
    } else {
        WeatherCode::Clear
    }
}

// ============================================================================
// Apparent Temperature
// ============================================================================

/// Apparent temperature in °C. Wind speed is in m/s.
pub fn feels_like(temperature: f64, humidity: f64, wind_speed: f64, is_desert: bool) -> f64 {
    if is_desert {
        if temperature >= 30.0 {
            return temperature + (temperature - 25.0) * 0.1;
        }
        if temperature <= 15.0 && wind_speed > 2.0 {
            return wind_chill(temperature, wind_speed);
        }
    } else {
        if temperature >= 27.0 {
            return temperature + 0.5 * (humidity / 100.0) * (temperature - 20.0);
        }
        if temperature <= 10.0 && wind_speed > 1.34 {
            return wind_chill(temperature, wind_speed);
        }
    }
    temperature
}

/// Environment Canada wind chill, wind converted from m/s to km/h
fn wind_chill(temperature: f64, wind_speed: f64) -> f64 {
    let v = (wind_speed * 3.6).powf(0.16);
    13.12 + 0.6215 * temperature - 11.37 * v + 0.3965 * temperature * v
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_any_precipitation_means_a_wet_code(
            precipitation in 0.0001f64..100.0,
            cloud in 0.0f64..=100.0,
            humidity in 0.0f64..=100.0,
        ) {
            prop_assert!(cloud_weather_code(precipitation, cloud) >= WeatherCode::Drizzle);
            prop_assert!(generic_weather_code(precipitation, humidity) >= WeatherCode::Drizzle);
        }

        #[test]
        fn prop_heat_never_feels_cooler(
            temperature in 30.0f64..60.0,
            humidity in 0.0f64..=100.0,
            wind in 0.0f64..20.0,
            desert in any::<bool>(),
        ) {
            prop_assert!(feels_like(temperature, humidity, wind, desert) >= temperature);
        }
    }
}
