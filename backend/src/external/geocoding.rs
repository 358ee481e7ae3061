//! City search via a Nominatim-compatible geocoder

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{http_client, send_checked, FetchError};

const MAX_RESULTS: usize = 5;

/// Geocoding client
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

/// A search hit returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Nominatim reports coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn into_place(self) -> Option<Place> {
        Some(Place {
            lat: self.lat.trim().parse().ok()?,
            lon: self.lon.trim().parse().ok()?,
            name: self.display_name,
        })
    }
}

impl GeocodingClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout, user_agent)?,
            base_url: base_url.into(),
        })
    }

    /// Search for places matching `query`, best match first
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, FetchError> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "5"),
            ]);

        let response = send_checked(request).await?;
        let places: Vec<NominatimPlace> = response.json().await?;

        let results: Vec<Place> = places
            .into_iter()
            .filter_map(NominatimPlace::into_place)
            .take(MAX_RESULTS)
            .collect();

        tracing::debug!("Geocoder returned {} places for {:?}", results.len(), query);
        Ok(results)
    }
}
