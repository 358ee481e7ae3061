//! Shared helpers for router-level integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use weather_aggregator_backend::{create_app, AppState, Config, ErrorCatalog};
use wiremock::MockServer;

/// One mock server per upstream
pub struct Upstreams {
    pub power: MockServer,
    pub gmao: MockServer,
    pub worldview: MockServer,
    pub geocoder: MockServer,
}

impl Upstreams {
    pub async fn start() -> Self {
        Self {
            power: MockServer::start().await,
            gmao: MockServer::start().await,
            worldview: MockServer::start().await,
            geocoder: MockServer::start().await,
        }
    }

    /// Router wired to the mock servers
    pub fn app(&self) -> Router {
        self.app_with(|_| {})
    }

    /// Router wired to the mock servers, after `adjust` edits the config
    pub fn app_with(&self, adjust: impl FnOnce(&mut Config)) -> Router {
        let mut config = Config::default();
        config.providers.power_url = self.power.uri();
        config.providers.gmao_url = self.gmao.uri();
        config.providers.worldview_url = self.worldview.uri();
        config.providers.power_timeout_secs = 2;
        config.providers.gmao_timeout_secs = 2;
        config.providers.worldview_timeout_secs = 2;
        config.geocoding.url = self.geocoder.uri();
        config.geocoding.timeout_secs = 2;
        adjust(&mut config);

        let state = AppState::new(config, catalog()).expect("app state");
        create_app(state)
    }
}

pub fn catalog() -> ErrorCatalog {
    ErrorCatalog::from_json(include_str!("../../config/errors.json")).expect("error catalog")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("UTF-8 body")
    }

    pub fn error_code(&self) -> String {
        self.json()["error"]["code"].as_str().unwrap_or_default().to_string()
    }
}

/// Send a GET through the router without binding a socket
pub async fn get(app: Router, uri: &str) -> TestResponse {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// A minimal POWER payload; `overrides` replaces single-day values
pub fn power_payload(overrides: &[(&str, f64)]) -> serde_json::Value {
    let mut values = vec![
        ("T2M", 25.0),
        ("T2M_MAX", 30.0),
        ("T2M_MIN", 18.0),
        ("RH2M", 60.0),
        ("WS2M", 3.0),
        ("WS50M", 5.0),
        ("PRECTOTCORR", 0.0),
        ("PS", 101.3),
        ("ALLSKY_SFC_SW_DWN", 5.0),
        ("CLOUD_AMT", 20.0),
    ];
    for (name, value) in overrides {
        if let Some(slot) = values.iter_mut().find(|(n, _)| n == name) {
            slot.1 = *value;
        }
    }

    let parameter: serde_json::Map<String, serde_json::Value> = values
        .into_iter()
        .map(|(name, value)| (name.to_string(), serde_json::json!({ "20240519": value })))
        .collect();
    serde_json::json!({ "properties": { "parameter": parameter } })
}
