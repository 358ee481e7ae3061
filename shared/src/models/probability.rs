//! Threshold and historical-series models

use serde::{Deserialize, Serialize};

/// User-supplied cutoffs. Only present keys are evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSet {
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl ThresholdSet {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.precipitation.is_none() && self.wind_speed.is_none()
    }
}

/// Daily samples per dimension, regenerated for every request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    pub temperature: Option<Vec<f64>>,
    pub precipitation: Option<Vec<f64>>,
    pub wind_speed: Option<Vec<f64>>,
}

/// Exceedance percentages; a missing threshold leaves its key out entirely
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbabilitySet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_above: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_above: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_above: Option<u8>,
}
