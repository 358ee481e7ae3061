//! Forecast export for downloads

use serde::Serialize;
use shared::FormattedSnapshot;

use crate::error::{AppError, AppResult};
use crate::services::weather::WeatherReport;

pub const CSV_HEADER: [&str; 9] = [
    "Date",
    "Temperature_C",
    "Max_Temp_C",
    "Min_Temp_C",
    "Humidity_Percent",
    "Wind_Speed_ms",
    "Precipitation_mm",
    "Pressure_hPa",
    "Conditions",
];

/// Download formats accepted by `/weather/download`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Parse the `format` query value, defaulting to JSON when absent
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("json") => Some(ExportFormat::Json),
            Some("csv") => Some(ExportFormat::Csv),
            Some(_) => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// A CSV row; field order matches [`CSV_HEADER`]
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: String,
    temperature: f64,
    temperature_max: f64,
    temperature_min: f64,
    humidity: &'a str,
    wind_speed: f64,
    precipitation: f64,
    pressure: f64,
    conditions: &'a str,
}

impl<'a> From<&'a FormattedSnapshot> for CsvRow<'a> {
    fn from(day: &'a FormattedSnapshot) -> Self {
        Self {
            date: day.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            temperature: day.temperature,
            temperature_max: day.temperature_max,
            temperature_min: day.temperature_min,
            humidity: day.humidity.without_suffix(),
            wind_speed: day.wind_speed,
            precipitation: day.precipitation,
            pressure: day.pressure,
            conditions: &day.conditions,
        }
    }
}

/// Suggested download name, e.g. `weather_30_31.2.csv`
pub fn file_name(report: &WeatherReport, format: ExportFormat) -> String {
    format!(
        "weather_{}_{}.{}",
        report.location.lat,
        report.location.lon,
        format.extension()
    )
}

/// Render the forecast days as CSV
pub fn forecast_csv(forecast: &[FormattedSnapshot]) -> AppResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record(CSV_HEADER)
        .map_err(|e| AppError::Export(format!("CSV header error: {}", e)))?;
    for day in forecast {
        wtr.serialize(CsvRow::from(day))
            .map_err(|e| AppError::Export(format!("CSV serialization error: {}", e)))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Export(format!("UTF-8 conversion error: {}", e)))
}

/// Render the full report as pretty-printed JSON
pub fn report_json(report: &WeatherReport) -> AppResult<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {}", e)))
}

/// Render `report` in the requested format
pub fn render(report: &WeatherReport, format: ExportFormat) -> AppResult<String> {
    match format {
        ExportFormat::Csv => forecast_csv(&report.forecast),
        ExportFormat::Json => report_json(report),
    }
}
