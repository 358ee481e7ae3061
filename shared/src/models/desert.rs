//! Desert region classification

use serde::Serialize;

/// An axis-aligned lat/lon box around one of the major deserts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesertRegion {
    pub name: &'static str,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl DesertRegion {
    const fn new(name: &'static str, lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            name,
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Inclusive on every edge
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Boxes may overlap (Sahara/Arabian); the first match wins.
pub const DESERT_REGIONS: [DesertRegion; 8] = [
    DesertRegion::new("Sahara", 15.0, 30.0, -20.0, 50.0),
    DesertRegion::new("Arabian", 15.0, 30.0, 35.0, 60.0),
    DesertRegion::new("Gobi", 35.0, 50.0, 85.0, 120.0),
    DesertRegion::new("Australian", -30.0, -20.0, 120.0, 150.0),
    DesertRegion::new("North American", 25.0, 40.0, -120.0, -100.0),
    DesertRegion::new("Kalahari", -25.0, -15.0, 15.0, 25.0),
    DesertRegion::new("Thar", 20.0, 30.0, 65.0, 75.0),
    DesertRegion::new("Syrian", 30.0, 35.0, 35.0, 45.0),
];

/// Find the first desert region containing the point
pub fn desert_region(lat: f64, lon: f64) -> Option<&'static DesertRegion> {
    DESERT_REGIONS.iter().find(|region| region.contains(lat, lon))
}

pub fn is_desert(lat: f64, lon: f64) -> bool {
    desert_region(lat, lon).is_some()
}
