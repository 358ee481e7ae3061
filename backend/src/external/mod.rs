//! External API integrations
//!
//! Each weather provider implements [`WeatherProvider`]. A provider never
//! returns an error to the pipeline: transport failures, bad statuses and
//! unusable payloads are logged and reported as `None` so the next provider
//! in the chain gets its turn.

pub mod geocoding;
pub mod gmao;
pub mod power;
pub mod worldview;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use shared::{Coordinate, ProviderResult};
use thiserror::Error;

pub use geocoding::{GeocodingClient, Place};
pub use gmao::GmaoClient;
pub use power::PowerClient;
pub use worldview::WorldviewClient;

/// Per-request inputs shared by every provider
#[derive(Debug, Clone, Copy)]
pub struct FetchContext {
    /// Reference time for the report (server local time unless overridden)
    pub now: NaiveDateTime,
    pub forecast_days: usize,
}

/// A single upstream weather source
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn try_fetch(
        &self,
        coordinate: &Coordinate,
        is_desert: bool,
        ctx: &FetchContext,
    ) -> Option<ProviderResult>;
}

/// Why an upstream call produced nothing usable
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error("unusable payload: {0}")]
    Payload(String),
}

/// Build an HTTP client with a hard request timeout
pub(crate) fn http_client(timeout: Duration, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

pub(crate) const USER_AGENT: &str = concat!("weather-aggregator/", env!("CARGO_PKG_VERSION"));

/// Send a prepared request and insist on a 2xx status
pub(crate) async fn send_checked(request: reqwest::RequestBuilder) -> Result<reqwest::Response, FetchError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }
    Ok(response)
}
