//! GMAO forecast client
//!
//! The GMAO endpoint already returns daily forecasts, so each upstream day
//! maps to one output day and the current conditions are taken from day 0.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use shared::climate;
use shared::conditions::{feels_like, generic_conditions, generic_weather_code};
use shared::{resolve, Coordinate, ProviderResult, WeatherSnapshot, SOURCE_GMAO};

use super::{http_client, send_checked, FetchContext, FetchError, WeatherProvider, USER_AGENT};

const DATA_QUALITY: &str = "Model forecast (NASA GMAO)";

/// GMAO forecast client
#[derive(Clone)]
pub struct GmaoClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GmaoResponse {
    #[serde(default)]
    forecast: Vec<GmaoDay>,
}

#[derive(Debug, Default, Deserialize)]
struct GmaoDay {
    date: Option<NaiveDate>,
    temperature: Option<f64>,
    temperature_max: Option<f64>,
    temperature_min: Option<f64>,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    precipitation: Option<f64>,
    pressure: Option<f64>,
    cloud_cover: Option<f64>,
}

impl GmaoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout, USER_AGENT)?,
            base_url: base_url.into(),
        })
    }

    async fn fetch(&self, coordinate: &Coordinate, days: usize) -> Result<GmaoResponse, FetchError> {
        let request = self
            .client
            .get(format!("{}/forecast", self.base_url))
            .query(&[
                ("lat", coordinate.lat().to_string()),
                ("lon", coordinate.lon().to_string()),
                ("days", days.to_string()),
            ]);

        let response = send_checked(request).await?;
        let data: GmaoResponse = response.json().await?;
        if data.forecast.is_empty() {
            return Err(FetchError::Payload("empty forecast array".to_string()));
        }
        Ok(data)
    }
}

#[async_trait]
impl WeatherProvider for GmaoClient {
    fn name(&self) -> &'static str {
        SOURCE_GMAO
    }

    async fn try_fetch(
        &self,
        coordinate: &Coordinate,
        is_desert: bool,
        ctx: &FetchContext,
    ) -> Option<ProviderResult> {
        match self.fetch(coordinate, ctx.forecast_days).await {
            Ok(data) => build_result(data, coordinate.lat(), is_desert, ctx),
            Err(e) => {
                tracing::warn!("NASA GMAO unavailable: {}", e);
                None
            }
        }
    }
}

fn build_result(data: GmaoResponse, lat: f64, is_desert: bool, ctx: &FetchContext) -> Option<ProviderResult> {
    let mut rng = rand::rng();
    let start = ctx.now.date();

    let forecast: Vec<WeatherSnapshot> = data
        .forecast
        .into_iter()
        .take(ctx.forecast_days)
        .zip(start.iter_days())
        .map(|(day, fallback_date)| map_day(day, fallback_date, lat, is_desert, &mut rng))
        .collect();

    let mut current = forecast.first()?.clone();
    current.date = None;

    Some(ProviderResult {
        current,
        forecast,
        data_source: SOURCE_GMAO,
    })
}

fn map_day<R: Rng + ?Sized>(
    day: GmaoDay,
    fallback_date: NaiveDate,
    lat: f64,
    is_desert: bool,
    rng: &mut R,
) -> WeatherSnapshot {
    let date = day.date.unwrap_or(fallback_date);
    let temperature = resolve(
        day.temperature,
        climate::temperature(lat, is_desert, date.month(), climate::AFTERNOON_HOUR),
    );
    let humidity = resolve(day.humidity, climate::humidity(lat, is_desert, rng));
    let wind_speed = resolve(day.wind_speed, climate::wind_speed(lat, is_desert, rng));
    let precipitation = resolve(day.precipitation, climate::precipitation(lat, is_desert, rng));

    WeatherSnapshot {
        date: Some(date),
        temperature,
        temperature_max: resolve(
            day.temperature_max,
            climate::temperature_max(temperature, is_desert, rng),
        ),
        temperature_min: resolve(
            day.temperature_min,
            climate::temperature_min(temperature, is_desert, rng),
        ),
        humidity,
        wind_speed,
        wind_speed_50m: None,
        precipitation,
        pressure: resolve(day.pressure, climate::pressure(lat, is_desert, rng)),
        solar_radiation: None,
        cloud_cover: day.cloud_cover.filter(|v| shared::is_valid_nasa_value(Some(*v))),
        conditions: generic_conditions(precipitation, humidity, is_desert).to_string(),
        weather_code: generic_weather_code(precipitation, humidity),
        feels_like: feels_like(temperature, humidity, wind_speed, is_desert),
        data_quality: DATA_QUALITY.to_string(),
        confidence: None,
        source: SOURCE_GMAO.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FetchContext {
        FetchContext {
            now: NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            forecast_days: 7,
        }
    }

    #[test]
    fn test_current_comes_from_first_day() {
        let data: GmaoResponse = serde_json::from_value(serde_json::json!({
            "forecast": [
                { "date": "2024-01-10", "temperature": 12.0, "temperature_max": 15.0,
                  "temperature_min": 8.0, "humidity": 90.0, "wind_speed": 2.0,
                  "precipitation": 3.0, "pressure": 1009.0 },
                { "date": "2024-01-11", "temperature": 10.0, "humidity": 50.0,
                  "wind_speed": 1.0, "precipitation": 0.0, "pressure": 1012.0 }
            ]
        }))
        .unwrap();

        let result = build_result(data, 48.0, false, &ctx()).unwrap();
        assert_eq!(result.forecast.len(), 2);
        assert_eq!(result.current.temperature, 12.0);
        assert_eq!(result.current.date, None);
        assert_eq!(result.current.conditions, "Rain");
        assert_eq!(result.forecast[1].date, NaiveDate::from_ymd_opt(2024, 1, 11));
        assert_eq!(result.forecast[1].conditions, "Mostly Clear");
    }

    #[test]
    fn test_sentinels_and_missing_dates() {
        let data: GmaoResponse = serde_json::from_value(serde_json::json!({
            "forecast": [
                { "temperature": -999.0, "humidity": -999.0, "wind_speed": 4.0,
                  "precipitation": 0.0, "pressure": -999.0 }
            ]
        }))
        .unwrap();

        let result = build_result(data, 48.0, false, &ctx()).unwrap();
        let day = &result.forecast[0];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert!(day.temperature > -900.0);
        assert!((55.0..80.0).contains(&day.humidity));
        assert!((1005.0..1025.0).contains(&day.pressure));
        assert_eq!(day.wind_speed, 4.0);
    }

    #[test]
    fn test_forecast_is_capped() {
        let days: Vec<serde_json::Value> = (0..10)
            .map(|_| serde_json::json!({ "temperature": 20.0 }))
            .collect();
        let data: GmaoResponse = serde_json::from_value(serde_json::json!({ "forecast": days })).unwrap();

        let result = build_result(data, 0.0, false, &ctx()).unwrap();
        assert_eq!(result.forecast.len(), 7);
    }

    #[test]
    fn test_zero_forecast_days_yields_nothing() {
        let data: GmaoResponse =
            serde_json::from_value(serde_json::json!({ "forecast": [{ "temperature": 20.0 }] })).unwrap();
        let ctx = FetchContext {
            forecast_days: 0,
            ..ctx()
        };
        assert!(build_result(data, 0.0, false, &ctx).is_none());
    }
}
