//! Inspection center records

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// An inspection center with its configured geofence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Geofence radius in meters
    #[serde(default, rename = "radius")]
    pub radius_m: Option<f64>,
    /// Inner (compliant) zone radius in meters
    #[serde(default, rename = "greenZoneRadius")]
    pub green_zone_radius_m: Option<f64>,
    /// Outer (warning) zone radius in meters
    #[serde(default, rename = "yellowZoneRadius")]
    pub yellow_zone_radius_m: Option<f64>,
}

impl CenterRecord {
    /// Create a center at the given location
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: Some(location),
            ..Default::default()
        }
    }

    /// Set the geofence radius
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = Some(radius_m);
        self
    }

    /// Set the green/yellow zone radii
    pub fn with_zones(mut self, green_m: f64, yellow_m: f64) -> Self {
        self.green_zone_radius_m = Some(green_m);
        self.yellow_zone_radius_m = Some(yellow_m);
        self
    }
}
