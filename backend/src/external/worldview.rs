//! NASA Worldview snapshot client
//!
//! Worldview serves imagery, not measurements. A successful snapshot request
//! only confirms that imagery exists for the area; the values themselves come
//! from the climate model.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::climate;
use shared::{Coordinate, ProviderResult, WeatherSnapshot, SOURCE_WORLDVIEW};

use super::{http_client, send_checked, FetchContext, FetchError, WeatherProvider, USER_AGENT};

const SNAPSHOT_PATH: &str = "/api/v1/snapshot";
const LAYER: &str = "MODIS_Terra_CorrectedReflectance_TrueColor";
const DATA_QUALITY: &str = "Simulated (Worldview imagery available)";

/// Worldview Snapshots client
#[derive(Clone)]
pub struct WorldviewClient {
    client: Client,
    base_url: String,
}

/// One degree around the point, clamped to valid bounds.
/// Worldview expects `lat_min,lon_min,lat_max,lon_max` for EPSG:4326.
fn bounding_box(coordinate: &Coordinate) -> String {
    let lat_min = (coordinate.lat() - 1.0).max(-90.0);
    let lat_max = (coordinate.lat() + 1.0).min(90.0);
    let lon_min = (coordinate.lon() - 1.0).max(-180.0);
    let lon_max = (coordinate.lon() + 1.0).min(180.0);
    format!("{},{},{},{}", lat_min, lon_min, lat_max, lon_max)
}

impl WorldviewClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout, USER_AGENT)?,
            base_url: base_url.into(),
        })
    }

    async fn probe(&self, coordinate: &Coordinate, ctx: &FetchContext) -> Result<(), FetchError> {
        let request = self
            .client
            .get(format!("{}{}", self.base_url, SNAPSHOT_PATH))
            .query(&[
                ("REQUEST", "GetSnapshot".to_string()),
                ("TIME", ctx.now.date().format("%Y-%m-%d").to_string()),
                ("BBOX", bounding_box(coordinate)),
                ("CRS", "EPSG:4326".to_string()),
                ("LAYERS", LAYER.to_string()),
                ("FORMAT", "image/jpeg".to_string()),
                ("WIDTH", "256".to_string()),
                ("HEIGHT", "256".to_string()),
            ]);

        send_checked(request).await?;
        Ok(())
    }
}

#[async_trait]
impl WeatherProvider for WorldviewClient {
    fn name(&self) -> &'static str {
        SOURCE_WORLDVIEW
    }

    async fn try_fetch(
        &self,
        coordinate: &Coordinate,
        is_desert: bool,
        ctx: &FetchContext,
    ) -> Option<ProviderResult> {
        if let Err(e) = self.probe(coordinate, ctx).await {
            tracing::warn!("NASA Worldview unavailable: {}", e);
            return None;
        }

        tracing::debug!("Worldview imagery available, using climate model values");
        Some(simulated_result(coordinate.lat(), is_desert, ctx))
    }
}

fn simulated_result(lat: f64, is_desert: bool, ctx: &FetchContext) -> ProviderResult {
    let relabel = |mut snapshot: WeatherSnapshot| {
        snapshot.data_quality = DATA_QUALITY.to_string();
        snapshot.source = SOURCE_WORLDVIEW.to_string();
        snapshot
    };

    let simulated = climate::synthetic_weather(lat, is_desert, ctx.now, ctx.forecast_days);
    ProviderResult {
        current: relabel(simulated.current),
        forecast: simulated.forecast.into_iter().map(relabel).collect(),
        data_source: SOURCE_WORLDVIEW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_bounding_box_is_clamped() {
        let coordinate = Coordinate::new(89.5, -179.5).unwrap();
        assert_eq!(bounding_box(&coordinate), "88.5,-180,90,-178.5");

        let coordinate = Coordinate::new(10.0, 20.0).unwrap();
        assert_eq!(bounding_box(&coordinate), "9,19,11,21");
    }

    #[test]
    fn test_result_is_relabelled() {
        let ctx = FetchContext {
            now: NaiveDate::from_ymd_opt(2024, 8, 1)
                .unwrap()
                .and_hms_opt(15, 0, 0)
                .unwrap(),
            forecast_days: 7,
        };
        let result = simulated_result(30.0, false, &ctx);

        assert_eq!(result.data_source, "NASA Worldview");
        assert_eq!(result.forecast.len(), 7);
        assert!(result.forecast.iter().all(|day| day.source == "NASA Worldview"));
        assert_eq!(result.current.data_quality, DATA_QUALITY);
    }
}
