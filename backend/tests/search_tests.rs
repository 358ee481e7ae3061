//! City search tests against a mock geocoder

mod common;

use axum::http::StatusCode;
use common::{get, Upstreams};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_search_returns_parsed_places() {
    let mocks = Upstreams::start().await;
    let hits: Vec<serde_json::Value> = (0..7)
        .map(|i| {
            serde_json::json!({
                "display_name": format!("Springfield {}", i),
                "lat": format!("{}.5", 30 + i),
                "lon": "-89.65",
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Springfield"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits))
        .expect(1)
        .mount(&mocks.geocoder)
        .await;

    let response = get(mocks.app(), "/search?citySrch=Springfield").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    let places = body.as_array().unwrap();
    assert_eq!(places.len(), 5);
    assert_eq!(places[0]["name"], "Springfield 0");
    assert_eq!(places[0]["lat"], 30.5);
    assert_eq!(places[0]["lon"], -89.65);
}

#[tokio::test]
async fn test_unparsable_entries_are_dropped() {
    let mocks = Upstreams::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "display_name": "Broken", "lat": "", "lon": "1" },
            { "display_name": "Cairo, Egypt", "lat": "30.0444", "lon": "31.2357" }
        ])))
        .mount(&mocks.geocoder)
        .await;

    let body = get(mocks.app(), "/search?citySrch=Cairo").await.json();
    let places = body.as_array().unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0]["name"], "Cairo, Egypt");
}

#[tokio::test]
async fn test_missing_query() {
    let mocks = Upstreams::start().await;

    for uri in ["/search", "/search?citySrch=", "/search?citySrch=%20%20"] {
        let response = get(mocks.app(), uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(response.error_code(), "MISSING_SEARCH_QUERY", "{}", uri);
    }
}

#[tokio::test]
async fn test_geocoder_failure() {
    let mocks = Upstreams::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mocks.geocoder)
        .await;

    let response = get(mocks.app(), "/search?citySrch=Paris").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.error_code(), "GEOCODING_FAILED");
}
