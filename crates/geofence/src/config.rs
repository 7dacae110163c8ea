//! Geofence configuration

use serde::{Deserialize, Serialize};

/// Geofence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeofenceConfig {
    /// Radius applied when a center has none configured (meters)
    pub default_radius_m: f64,

    /// Yellow zone radius as a multiple of the green radius, when a center
    /// configures no yellow zone
    pub yellow_zone_factor: f64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            default_radius_m: 500.0,
            yellow_zone_factor: 2.0,
        }
    }
}

impl GeofenceConfig {
    /// Create strict config (tighter default fence)
    pub fn strict() -> Self {
        Self {
            default_radius_m: 250.0,
            ..Default::default()
        }
    }

    /// Create lenient config (wider default fence)
    pub fn lenient() -> Self {
        Self {
            default_radius_m: 1000.0,
            ..Default::default()
        }
    }
}
