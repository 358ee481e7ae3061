//! Validation utilities for provider payloads and request coordinates
//!
//! NASA data services encode "no data" as `-999`. Every numeric field read
//! from a provider payload goes through [`resolve`] before it reaches a
//! snapshot.

/// Missing-data marker used by NASA POWER and related services
pub const NASA_MISSING_VALUE: f64 = -999.0;

/// Anything below this is treated as sentinel noise
const SENTINEL_FLOOR: f64 = -900.0;

// ============================================================================
// Sentinel Validation
// ============================================================================

/// Check whether a provider value is usable
pub fn is_valid_nasa_value(value: Option<f64>) -> bool {
    match value {
        Some(v) => v.is_finite() && v != NASA_MISSING_VALUE && v >= SENTINEL_FLOOR,
        None => false,
    }
}

/// Return `value` when it is usable, otherwise `fallback`
pub fn resolve(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if is_valid_nasa_value(Some(v)) => v,
        _ => fallback,
    }
}

// ============================================================================
// Coordinate Validation
// ============================================================================

/// Which axis a raw coordinate value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Validate a single coordinate component.
///
/// Latitude outside [-90, 90] is rejected. Longitude outside [-180, 180] is
/// wrapped back into range (190 becomes -170). Non-finite input is always
/// rejected.
pub fn validate_coordinate(value: f64, axis: Axis) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    match axis {
        Axis::Latitude => (-90.0..=90.0).contains(&value).then_some(value),
        Axis::Longitude => {
            if (-180.0..=180.0).contains(&value) {
                Some(value)
            } else {
                Some((value + 180.0).rem_euclid(360.0) - 180.0)
            }
        }
    }
}
