//! NASA POWER daily point client
//!
//! POWER publishes daily satellite-derived values with a lag of a day or
//! more, so the client asks for the trailing week and uses the most recent
//! day that has a real temperature. The forecast is projected from that
//! single reading.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use shared::climate;
use shared::conditions::{cloud_conditions, cloud_weather_code, feels_like};
use shared::{
    is_valid_nasa_value, resolve, Coordinate, ProviderResult, WeatherSnapshot, SOURCE_POWER,
};

use super::{http_client, send_checked, FetchContext, FetchError, WeatherProvider, USER_AGENT};

const DAILY_POINT_PATH: &str = "/api/temporal/daily/point";
const PARAMETERS: &str = "T2M,T2M_MAX,T2M_MIN,RH2M,WS2M,WS50M,PRECTOTCORR,PS,ALLSKY_SFC_SW_DWN,CLOUD_AMT";
const LOOKBACK_DAYS: u64 = 7;

/// NASA POWER client
#[derive(Clone)]
pub struct PowerClient {
    client: Client,
    base_url: String,
}

/// POWER JSON response, reduced to the parameter table
#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    /// parameter name -> YYYYMMDD -> value
    parameter: HashMap<String, BTreeMap<String, Option<f64>>>,
}

/// One day's raw values, sentinels still included
#[derive(Debug, Clone, Default, PartialEq)]
struct PowerReading {
    temperature: Option<f64>,
    temperature_max: Option<f64>,
    temperature_min: Option<f64>,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    wind_speed_50m: Option<f64>,
    precipitation: Option<f64>,
    pressure_kpa: Option<f64>,
    solar_radiation: Option<f64>,
    cloud_cover: Option<f64>,
}

impl PowerResponse {
    /// Pick the latest day whose T2M is valid
    fn latest_reading(&self) -> Result<PowerReading, FetchError> {
        let temperatures = self
            .properties
            .parameter
            .get("T2M")
            .ok_or_else(|| FetchError::Payload("missing T2M series".to_string()))?;

        let day = temperatures
            .iter()
            .rev()
            .find(|(_, value)| is_valid_nasa_value(**value))
            .map(|(day, _)| day.as_str())
            .ok_or_else(|| FetchError::Payload("no valid T2M values".to_string()))?;

        let value = |name: &str| {
            self.properties
                .parameter
                .get(name)
                .and_then(|series| series.get(day))
                .copied()
                .flatten()
        };

        Ok(PowerReading {
            temperature: value("T2M"),
            temperature_max: value("T2M_MAX"),
            temperature_min: value("T2M_MIN"),
            humidity: value("RH2M"),
            wind_speed: value("WS2M"),
            wind_speed_50m: value("WS50M"),
            precipitation: value("PRECTOTCORR"),
            pressure_kpa: value("PS"),
            solar_radiation: value("ALLSKY_SFC_SW_DWN"),
            cloud_cover: value("CLOUD_AMT"),
        })
    }
}

impl PowerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout, USER_AGENT)?,
            base_url: base_url.into(),
        })
    }

    async fn fetch(&self, coordinate: &Coordinate, today: NaiveDate) -> Result<PowerResponse, FetchError> {
        let end = today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| FetchError::Payload("date out of range".to_string()))?;
        let start = end
            .checked_sub_days(Days::new(LOOKBACK_DAYS - 1))
            .ok_or_else(|| FetchError::Payload("date out of range".to_string()))?;

        let request = self
            .client
            .get(format!("{}{}", self.base_url, DAILY_POINT_PATH))
            .query(&[
                ("parameters", PARAMETERS.to_string()),
                ("community", "AG".to_string()),
                ("latitude", coordinate.lat().to_string()),
                ("longitude", coordinate.lon().to_string()),
                ("start", start.format("%Y%m%d").to_string()),
                ("end", end.format("%Y%m%d").to_string()),
                ("format", "JSON".to_string()),
            ]);

        let response = send_checked(request).await?;
        Ok(response.json::<PowerResponse>().await?)
    }
}

#[async_trait]
impl WeatherProvider for PowerClient {
    fn name(&self) -> &'static str {
        SOURCE_POWER
    }

    async fn try_fetch(
        &self,
        coordinate: &Coordinate,
        is_desert: bool,
        ctx: &FetchContext,
    ) -> Option<ProviderResult> {
        let reading = match self
            .fetch(coordinate, ctx.now.date())
            .await
            .and_then(|data| data.latest_reading())
        {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!("NASA POWER unavailable: {}", e);
                return None;
            }
        };

        Some(build_result(&reading, coordinate.lat(), is_desert, ctx))
    }
}

/// Turn a raw reading into a current snapshot plus projected forecast,
/// filling any sentinel values from the climate model.
fn build_result(reading: &PowerReading, lat: f64, is_desert: bool, ctx: &FetchContext) -> ProviderResult {
    let mut rng = rand::rng();
    let current = current_snapshot(reading, lat, is_desert, ctx, &mut rng);
    let forecast = projected_forecast(&current, is_desert, ctx.now.date(), ctx.forecast_days, &mut rng);

    ProviderResult {
        current,
        forecast,
        data_source: SOURCE_POWER,
    }
}

fn current_snapshot<R: Rng + ?Sized>(
    reading: &PowerReading,
    lat: f64,
    is_desert: bool,
    ctx: &FetchContext,
    rng: &mut R,
) -> WeatherSnapshot {
    let simulated = climate::synthetic_snapshot(lat, is_desert, ctx.now, rng);

    let pressure_hpa = reading
        .pressure_kpa
        .filter(|kpa| is_valid_nasa_value(Some(*kpa)))
        .map(|kpa| kpa * 10.0);

    let gap_filled = [
        reading.temperature_max,
        reading.temperature_min,
        reading.humidity,
        reading.wind_speed,
        reading.precipitation,
        pressure_hpa,
        reading.cloud_cover,
    ]
    .iter()
    .filter(|value| !is_valid_nasa_value(**value))
    .count();

    let temperature = resolve(reading.temperature, simulated.temperature);
    let humidity = resolve(reading.humidity, simulated.humidity);
    let wind_speed = resolve(reading.wind_speed, simulated.wind_speed);
    let precipitation = resolve(reading.precipitation, simulated.precipitation);
    let cloud_cover = resolve(reading.cloud_cover, simulated.cloud_cover.unwrap_or_default());

    let data_quality = if gap_filled == 0 {
        "Satellite observation (NASA POWER)".to_string()
    } else {
        format!("Satellite observation (NASA POWER), {} fields simulated", gap_filled)
    };

    WeatherSnapshot {
        date: None,
        temperature,
        temperature_max: resolve(
            reading.temperature_max,
            climate::temperature_max(temperature, is_desert, rng),
        ),
        temperature_min: resolve(
            reading.temperature_min,
            climate::temperature_min(temperature, is_desert, rng),
        ),
        humidity,
        wind_speed,
        wind_speed_50m: reading.wind_speed_50m.filter(|v| is_valid_nasa_value(Some(*v))),
        precipitation,
        pressure: resolve(pressure_hpa, simulated.pressure),
        solar_radiation: reading.solar_radiation.filter(|v| is_valid_nasa_value(Some(*v))),
        cloud_cover: Some(cloud_cover),
        conditions: cloud_conditions(precipitation, cloud_cover, humidity, is_desert).to_string(),
        weather_code: cloud_weather_code(precipitation, cloud_cover),
        feels_like: feels_like(temperature, humidity, wind_speed, is_desert),
        data_quality,
        confidence: None,
        source: SOURCE_POWER.to_string(),
    }
}

/// Perturb the observed day into a short forecast
fn projected_forecast<R: Rng + ?Sized>(
    current: &WeatherSnapshot,
    is_desert: bool,
    start: NaiveDate,
    days: usize,
    rng: &mut R,
) -> Vec<WeatherSnapshot> {
    let observed_cloud = current.cloud_cover.unwrap_or_default();

    start
        .iter_days()
        .take(days)
        .enumerate()
        .map(|(i, date)| {
            let wave = (i as f64 * PI / 3.5).sin();
            let shift = wave * 2.0 + rng.random_range(-1.5..1.5);
            let temperature = current.temperature + shift;
            let humidity = (current.humidity + rng.random_range(-10.0..10.0)).clamp(0.0, 100.0);
            let wind_speed = (current.wind_speed + rng.random_range(-1.0..1.0)).max(0.0);
            let precipitation = (current.precipitation * rng.random_range(0.0..2.0)).max(0.0);
            let cloud_cover = (observed_cloud + rng.random_range(-15.0..15.0)).clamp(0.0, 100.0);

            WeatherSnapshot {
                date: Some(date),
                temperature,
                temperature_max: current.temperature_max + shift,
                temperature_min: current.temperature_min + shift,
                humidity,
                wind_speed,
                wind_speed_50m: current.wind_speed_50m.map(|v| (v + rng.random_range(-1.5..1.5)).max(0.0)),
                precipitation,
                pressure: current.pressure + rng.random_range(-3.0..3.0),
                solar_radiation: current.solar_radiation,
                cloud_cover: Some(cloud_cover),
                conditions: cloud_conditions(precipitation, cloud_cover, humidity, is_desert).to_string(),
                weather_code: cloud_weather_code(precipitation, cloud_cover),
                feels_like: feels_like(temperature, humidity, wind_speed, is_desert),
                data_quality: "Projected from NASA POWER observation".to_string(),
                confidence: Some(rng.random_range(0.75..0.95)),
                source: SOURCE_POWER.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(t2m: serde_json::Value, rh2m: serde_json::Value) -> PowerResponse {
        serde_json::from_value(serde_json::json!({
            "properties": {
                "parameter": {
                    "T2M": t2m,
                    "RH2M": rh2m,
                    "CLOUD_AMT": { "20240609": 40.0, "20240610": 55.0 },
                    "PS": { "20240609": 101.2, "20240610": 100.9 }
                }
            }
        }))
        .unwrap()
    }

    fn ctx() -> FetchContext {
        FetchContext {
            now: NaiveDate::from_ymd_opt(2024, 6, 11)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            forecast_days: 7,
        }
    }

    #[test]
    fn test_latest_valid_day_is_used() {
        let data = payload(
            serde_json::json!({ "20240609": 21.5, "20240610": -999.0 }),
            serde_json::json!({ "20240609": 60.0, "20240610": 70.0 }),
        );
        let reading = data.latest_reading().unwrap();
        assert_eq!(reading.temperature, Some(21.5));
        assert_eq!(reading.humidity, Some(60.0));
        assert_eq!(reading.pressure_kpa, Some(101.2));
        assert_eq!(reading.wind_speed, None);
    }

    #[test]
    fn test_all_sentinel_temperatures_are_unusable() {
        let data = payload(
            serde_json::json!({ "20240609": -999.0, "20240610": null }),
            serde_json::json!({}),
        );
        assert!(matches!(data.latest_reading(), Err(FetchError::Payload(_))));
    }

    #[test]
    fn test_sentinels_are_gap_filled() {
        let reading = PowerReading {
            temperature: Some(18.0),
            humidity: Some(-999.0),
            pressure_kpa: Some(101.3),
            cloud_cover: Some(20.0),
            precipitation: Some(0.0),
            ..Default::default()
        };
        let mut rng = rand::rng();
        let snapshot = current_snapshot(&reading, 45.0, false, &ctx(), &mut rng);

        assert_eq!(snapshot.temperature, 18.0);
        assert!((snapshot.pressure - 1013.0).abs() < 1e-9);
        assert!((55.0..80.0).contains(&snapshot.humidity));
        assert!(snapshot.wind_speed > 0.0);
        assert_eq!(snapshot.wind_speed_50m, None);
        assert_eq!(snapshot.conditions, "Mostly Clear");
        assert!(snapshot.data_quality.contains("simulated"));
    }

    #[test]
    fn test_projection_has_confidence_band() {
        let reading = PowerReading {
            temperature: Some(25.0),
            temperature_max: Some(30.0),
            temperature_min: Some(19.0),
            humidity: Some(55.0),
            wind_speed: Some(3.0),
            precipitation: Some(1.0),
            pressure_kpa: Some(101.0),
            cloud_cover: Some(50.0),
            ..Default::default()
        };
        let result = build_result(&reading, 10.0, false, &ctx());

        assert_eq!(result.forecast.len(), 7);
        assert_eq!(result.forecast[0].date, NaiveDate::from_ymd_opt(2024, 6, 11));
        for day in &result.forecast {
            let confidence = day.confidence.unwrap();
            assert!((0.75..0.95).contains(&confidence));
            assert!((0.0..=100.0).contains(&day.humidity));
            assert!(day.precipitation >= 0.0);
            assert!(day.temperature_max > day.temperature_min);
        }
    }
}
