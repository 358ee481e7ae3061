//! HTTP handlers for weather endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use shared::{Coordinate, ThresholdSet};

use crate::error::{AppResult, ErrorCatalog, ErrorKind};
use crate::services::export::{self, ExportFormat};
use crate::services::{WeatherReport, WeatherRequest};
use crate::AppState;

/// Query parameters for `/weather`. Everything arrives as text so that
/// malformed values map to catalog errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// JSON object, e.g. `{"temperature":30,"windSpeed":5}`
    pub thresholds: Option<String>,
    /// `YYYY-MM-DD`, replaces today's date
    pub date: Option<String>,
}

/// Query parameters for `/weather/download`
#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub format: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn parse_coordinate(errors: &ErrorCatalog, lat: Option<&String>, lon: Option<&String>) -> AppResult<Coordinate> {
    let (Some(lat), Some(lon)) = (non_blank(lat), non_blank(lon)) else {
        return Err(errors.error(ErrorKind::MissingCoordinates));
    };

    let invalid = || errors.error(ErrorKind::InvalidCoordinates);
    let lat = lat.parse::<f64>().map_err(|_| invalid())?;
    let lon = lon.parse::<f64>().map_err(|_| invalid())?;

    Coordinate::new(lat, lon).map_err(|e| {
        tracing::debug!("Rejected coordinate: {}", e);
        invalid()
    })
}

fn parse_thresholds(errors: &ErrorCatalog, raw: Option<&String>) -> AppResult<Option<ThresholdSet>> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    serde_json::from_str::<ThresholdSet>(raw)
        .map(Some)
        .map_err(|e| {
            tracing::debug!("Rejected thresholds {:?}: {}", raw, e);
            errors.error(ErrorKind::InvalidThresholds)
        })
}

/// Reference time: the requested day at the current wall-clock time
fn parse_reference_time(errors: &ErrorCatalog, raw: Option<&String>) -> AppResult<NaiveDateTime> {
    let now = Local::now().naive_local();
    let Some(raw) = non_blank(raw) else {
        return Ok(now);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(now.time()))
        .map_err(|_| errors.error(ErrorKind::InvalidDate))
}

/// Validate a `/weather` query into a pipeline request
pub fn parse_request(errors: &ErrorCatalog, query: &WeatherQuery) -> AppResult<WeatherRequest> {
    Ok(WeatherRequest {
        coordinate: parse_coordinate(errors, query.lat.as_ref(), query.lon.as_ref())?,
        thresholds: parse_thresholds(errors, query.thresholds.as_ref())?,
        now: parse_reference_time(errors, query.date.as_ref())?,
    })
}

/// Current conditions, forecast and optional exceedance probabilities
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<WeatherReport>> {
    let request = parse_request(&state.errors, &query)?;
    let report = state.weather.report_or_simulated(&request).await;
    Ok(Json(report))
}

/// The forecast as a CSV or JSON attachment
pub async fn download_weather(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> AppResult<Response> {
    let coordinate = parse_coordinate(&state.errors, query.lat.as_ref(), query.lon.as_ref())?;
    let format = ExportFormat::parse(query.format.as_deref())
        .ok_or_else(|| state.errors.error(ErrorKind::UnsupportedFormat))?;

    let request = WeatherRequest {
        coordinate,
        thresholds: None,
        now: Local::now().naive_local(),
    };
    let report = state.weather.report_or_simulated(&request).await;
    let body = export::render(&report, format).map_err(|e| state.errors.internal(e))?;
    let disposition = format!("attachment; filename=\"{}\"", export::file_name(&report, format));

    tracing::debug!("Exporting {} forecast days as {:?}", report.forecast.len(), format);
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
