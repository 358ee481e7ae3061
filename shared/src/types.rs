//! Common types used across the aggregator

use serde::Serialize;
use thiserror::Error;

use crate::models::{desert_region, DesertRegion};
use crate::validation::{validate_coordinate, Axis};

/// A validated geographic coordinate.
///
/// Latitude is guaranteed to lie in [-90, 90] and longitude has been wrapped
/// into [-180, 180]. Fields are private so a `Coordinate` can only be obtained
/// through [`Coordinate::new`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

/// Why a raw latitude/longitude pair was rejected
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is not a finite number")]
    InvalidLongitude(f64),
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        let lat = validate_coordinate(lat, Axis::Latitude)
            .ok_or(CoordinateError::LatitudeOutOfRange(lat))?;
        let lon = validate_coordinate(lon, Axis::Longitude)
            .ok_or(CoordinateError::InvalidLongitude(lon))?;
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// First desert region containing this point, if any
    pub fn desert_region(&self) -> Option<&'static DesertRegion> {
        desert_region(self.lat, self.lon)
    }

    pub fn is_desert(&self) -> bool {
        self.desert_region().is_some()
    }
}
