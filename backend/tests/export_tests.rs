//! Download endpoint tests
//!
//! CSV layout, JSON attachment and format validation.

mod common;

use axum::http::{header, StatusCode};
use common::{get, Upstreams};
use weather_aggregator_backend::services::export::{forecast_csv, ExportFormat, CSV_HEADER};
use wiremock::matchers::method;
use wiremock::{Mock, ResponseTemplate};

async fn offline_upstreams() -> Upstreams {
    let mocks = Upstreams::start().await;
    for server in [&mocks.power, &mocks.gmao, &mocks.worldview] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }
    mocks
}

#[tokio::test]
async fn test_csv_download() {
    let mocks = offline_upstreams().await;
    let response = get(mocks.app(), "/weather/download?lat=25&lon=10&format=csv").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"weather_25_10.csv\""
    );

    let text = response.text();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Temperature_C,Max_Temp_C,Min_Temp_C,Humidity_Percent,Wind_Speed_ms,Precipitation_mm,Pressure_hPa,Conditions")
    );

    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 7);
    for row in rows {
        let columns: Vec<&str> = row.split(',').collect();
        assert_eq!(columns.len(), 9, "row {:?}", row);
        assert!(!columns[4].contains('%'));
        let humidity: f64 = columns[4].parse().unwrap();
        assert!((0.0..=100.0).contains(&humidity));
    }
}

#[tokio::test]
async fn test_json_download_is_the_full_report() {
    let mocks = offline_upstreams().await;
    let response = get(mocks.app(), "/weather/download?lat=10&lon=20&format=json").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        response.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"weather_10_20.json\""
    );

    let text = response.text();
    assert!(text.contains('\n'), "expected pretty-printed JSON");
    let body = response.json();
    assert_eq!(body["data_source"], "NASA Climate Simulation");
    assert_eq!(body["forecast"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_json_is_the_default_format() {
    let mocks = offline_upstreams().await;
    let response = get(mocks.app(), "/weather/download?lat=10&lon=20").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn test_unsupported_format() {
    let mocks = Upstreams::start().await;
    let response = get(mocks.app(), "/weather/download?lat=10&lon=20&format=xml").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "UNSUPPORTED_FORMAT");
}

#[tokio::test]
async fn test_download_validates_coordinates() {
    let mocks = Upstreams::start().await;
    let response = get(mocks.app(), "/weather/download?format=csv").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "MISSING_COORDINATES");
}

#[test]
fn test_empty_forecast_still_has_header() {
    let csv = forecast_csv(&[]).unwrap();
    assert_eq!(csv.trim_end(), CSV_HEADER.join(","));
}

#[test]
fn test_format_parsing() {
    assert_eq!(ExportFormat::parse(None), Some(ExportFormat::Json));
    assert_eq!(ExportFormat::parse(Some("CSV")), Some(ExportFormat::Csv));
    assert_eq!(ExportFormat::parse(Some("pdf")), None);
}
