//! Threshold exceedance estimates over historical samples

use chrono::NaiveDate;

use crate::climate::synthetic_history;
use crate::models::{HistoricalSeries, ProbabilitySet, ThresholdSet};

/// Share of samples strictly above `threshold`, as a whole percent
pub fn percent_above(samples: &[f64], threshold: f64) -> u8 {
    if samples.is_empty() {
        return 0;
    }
    let above = samples.iter().filter(|&&v| v > threshold).count();
    (above as f64 / samples.len() as f64 * 100.0).round() as u8
}

/// Estimate every dimension that has both a threshold and a series.
pub fn estimate(thresholds: &ThresholdSet, history: &HistoricalSeries) -> ProbabilitySet {
    fn dimension(threshold: Option<f64>, series: Option<&Vec<f64>>) -> Option<u8> {
        Some(percent_above(series?, threshold?))
    }

    ProbabilitySet {
        temperature_above: dimension(thresholds.temperature, history.temperature.as_ref()),
        precipitation_above: dimension(thresholds.precipitation, history.precipitation.as_ref()),
        wind_speed_above: dimension(thresholds.wind_speed, history.wind_speed.as_ref()),
    }
}

/// Like [`estimate`], but any series missing for a requested dimension is
/// simulated first.
pub fn estimate_for_location(
    thresholds: &ThresholdSet,
    mut history: HistoricalSeries,
    lat: f64,
    is_desert: bool,
    today: NaiveDate,
    samples: usize,
) -> ProbabilitySet {
    let needs_temperature = thresholds.temperature.is_some() && history.temperature.is_none();
    let needs_precipitation = thresholds.precipitation.is_some() && history.precipitation.is_none();
    let needs_wind = thresholds.wind_speed.is_some() && history.wind_speed.is_none();

    if needs_temperature || needs_precipitation || needs_wind {
        let simulated = synthetic_history(lat, is_desert, today, samples, &mut rand::rng());
        if needs_temperature {
            history.temperature = simulated.temperature;
        }
        if needs_precipitation {
            history.precipitation = simulated.precipitation;
        }
        if needs_wind {
            history.wind_speed = simulated.wind_speed;
        }
    }

    estimate(thresholds, &history)
}
