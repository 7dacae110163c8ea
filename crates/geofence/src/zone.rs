//! Zone Band Classification

use serde::{Deserialize, Serialize};

use crate::GeofenceError;

/// Three-tier classification of a distance against nested thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneBand {
    /// Within the green radius
    Inside,
    /// Between the green and yellow radii
    Warning,
    /// Beyond the yellow radius
    Outside,
}

impl ZoneBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneBand::Inside => "Inside",
            ZoneBand::Warning => "Warning",
            ZoneBand::Outside => "Outside",
        }
    }
}

impl std::fmt::Display for ZoneBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a distance (meters) against green and yellow radii.
///
/// Both bounds are inclusive. Any thresholds are accepted; with
/// `yellow < green` the warning band is empty.
pub fn classify_band(distance: f64, green_radius: f64, yellow_radius: f64) -> ZoneBand {
    if distance <= green_radius {
        ZoneBand::Inside
    } else if distance <= yellow_radius {
        ZoneBand::Warning
    } else {
        ZoneBand::Outside
    }
}

/// Like [`classify_band`], but rejects thresholds that are not usable
/// distances or that are inverted.
pub fn try_classify_band(
    distance: f64,
    green_radius: f64,
    yellow_radius: f64,
) -> Result<ZoneBand, GeofenceError> {
    check_threshold("green", green_radius)?;
    check_threshold("yellow", yellow_radius)?;
    if green_radius > yellow_radius {
        return Err(GeofenceError::InvertedZones {
            green: green_radius,
            yellow: yellow_radius,
        });
    }
    Ok(classify_band(distance, green_radius, yellow_radius))
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), GeofenceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeofenceError::InvalidThreshold { field, value })
    }
}
