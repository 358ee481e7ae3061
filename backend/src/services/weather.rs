//! Weather pipeline: provider fallback, probabilities and formatting

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use shared::climate::synthetic_weather;
use shared::probability::estimate_for_location;
use shared::{
    format_forecast, Coordinate, Formattable, FormattedSnapshot, HistoricalSeries, ProbabilitySet,
    ProviderResult, ThresholdSet,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{FetchContext, GmaoClient, PowerClient, WeatherProvider, WorldviewClient};

/// A validated weather request
#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub coordinate: Coordinate,
    pub thresholds: Option<ThresholdSet>,
    pub now: NaiveDateTime,
}

/// Where the request was resolved
#[derive(Debug, Clone, Serialize)]
pub struct LocationInfo {
    pub lat: f64,
    pub lon: f64,
    pub is_desert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desert_region: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub data_quality: String,
    pub providers_attempted: Vec<&'static str>,
    pub fallback_used: bool,
    pub forecast_days: usize,
}

/// Response body of `/weather`
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub location: LocationInfo,
    pub data_source: &'static str,
    pub current: FormattedSnapshot,
    pub forecast: Vec<FormattedSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ProbabilitySet>,
    pub metadata: ReportMetadata,
}

/// Outcome of walking the provider chain
struct ChainOutcome {
    result: ProviderResult,
    attempted: Vec<&'static str>,
    fallback_used: bool,
}

/// Runs the provider chain for a request
#[derive(Clone)]
pub struct WeatherService {
    providers: Arc<Vec<Box<dyn WeatherProvider>>>,
    forecast_days: usize,
    historical_samples: usize,
}

impl WeatherService {
    /// Create a service over an explicit, ordered provider list
    pub fn new(providers: Vec<Box<dyn WeatherProvider>>, forecast_days: usize, historical_samples: usize) -> Self {
        Self {
            providers: Arc::new(providers),
            forecast_days,
            historical_samples,
        }
    }

    /// The standard POWER -> GMAO -> Worldview chain
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let providers = &config.providers;
        let build_err = |e: reqwest::Error| AppError::Internal(format!("Failed to build HTTP client: {}", e));

        let chain: Vec<Box<dyn WeatherProvider>> = vec![
            Box::new(PowerClient::new(&providers.power_url, providers.power_timeout()).map_err(build_err)?),
            Box::new(GmaoClient::new(&providers.gmao_url, providers.gmao_timeout()).map_err(build_err)?),
            Box::new(
                WorldviewClient::new(&providers.worldview_url, providers.worldview_timeout())
                    .map_err(build_err)?,
            ),
        ];

        Ok(Self::new(
            chain,
            config.forecast.days,
            config.forecast.historical_samples,
        ))
    }

    fn context(&self, request: &WeatherRequest) -> FetchContext {
        FetchContext {
            now: request.now,
            forecast_days: self.forecast_days,
        }
    }

    /// Try each provider in order; simulate when none answers
    async fn run_chain(&self, coordinate: &Coordinate, is_desert: bool, ctx: &FetchContext) -> ChainOutcome {
        let mut attempted = Vec::with_capacity(self.providers.len());

        for provider in self.providers.iter() {
            attempted.push(provider.name());
            if let Some(result) = provider.try_fetch(coordinate, is_desert, ctx).await {
                tracing::info!("Weather for {:?} served by {}", coordinate, provider.name());
                return ChainOutcome {
                    result,
                    attempted,
                    fallback_used: false,
                };
            }
        }

        tracing::info!(
            "All {} providers failed for {:?}, using climate simulation",
            attempted.len(),
            coordinate
        );
        ChainOutcome {
            result: synthetic_weather(coordinate.lat(), is_desert, ctx.now, ctx.forecast_days),
            attempted,
            fallback_used: true,
        }
    }

    /// Build a report from the provider chain
    pub async fn report(&self, request: &WeatherRequest) -> AppResult<WeatherReport> {
        let coordinate = &request.coordinate;
        let is_desert = coordinate.is_desert();
        let ctx = self.context(request);

        let outcome = self.run_chain(coordinate, is_desert, &ctx).await;
        if outcome.result.forecast.is_empty() {
            return Err(AppError::Provider(format!(
                "{} returned no forecast days",
                outcome.result.data_source
            )));
        }

        Ok(self.assemble(request, outcome))
    }

    /// Always succeeds: the provider chain, or pure simulation if the chain
    /// itself failed.
    pub async fn report_or_simulated(&self, request: &WeatherRequest) -> WeatherReport {
        match self.report(request).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Weather pipeline failed, degrading to simulation: {}", e);
                self.simulated_report(request)
            }
        }
    }

    /// A report built entirely from the climate model
    pub fn simulated_report(&self, request: &WeatherRequest) -> WeatherReport {
        let coordinate = &request.coordinate;
        let is_desert = coordinate.is_desert();
        let outcome = ChainOutcome {
            result: synthetic_weather(coordinate.lat(), is_desert, request.now, self.forecast_days),
            attempted: Vec::new(),
            fallback_used: true,
        };
        self.assemble(request, outcome)
    }

    fn assemble(&self, request: &WeatherRequest, outcome: ChainOutcome) -> WeatherReport {
        let coordinate = &request.coordinate;
        let region = coordinate.desert_region();
        let is_desert = region.is_some();

        let probabilities = request
            .thresholds
            .as_ref()
            .filter(|thresholds| !thresholds.is_empty())
            .map(|thresholds| {
                estimate_for_location(
                    thresholds,
                    HistoricalSeries::default(),
                    coordinate.lat(),
                    is_desert,
                    request.now.date(),
                    self.historical_samples,
                )
            });

        let current = outcome.result.current.formatted();
        let forecast = format_forecast(&outcome.result.forecast);

        WeatherReport {
            location: LocationInfo {
                lat: coordinate.lat(),
                lon: coordinate.lon(),
                is_desert,
                desert_region: region.map(|r| r.name),
            },
            data_source: outcome.result.data_source,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                data_quality: current.data_quality.clone(),
                providers_attempted: outcome.attempted,
                fallback_used: outcome.fallback_used,
                forecast_days: forecast.len(),
            },
            current,
            forecast,
            probabilities,
        }
    }
}
