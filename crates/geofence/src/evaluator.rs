//! Geofence Evaluator

use inspection_model::{CenterRecord, GeoPoint};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{classify_band, distance_between, GeofenceConfig, ZoneBand};

/// Why a geofence check failed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeofenceReason {
    /// Inspection or center coordinates absent or malformed
    MissingLocation,
    /// Inspection recorded beyond the center's radius
    OutsideRadius { distance_m: f64, radius_m: f64 },
}

impl std::fmt::Display for GeofenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeofenceReason::MissingLocation => f.write_str("Missing location data"),
            GeofenceReason::OutsideRadius { distance_m, radius_m } => write!(
                f,
                "Inspection location is {}m from center (allowed radius: {}m)",
                distance_m.round() as i64,
                radius_m.round() as i64
            ),
        }
    }
}

/// Outcome of a geofence check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViolationResult {
    pub violation: bool,
    /// Distance from the center in meters, when both locations are known
    pub distance_m: Option<f64>,
    /// Radius the distance was checked against
    pub radius_m: Option<f64>,
    pub reason: Option<GeofenceReason>,
}

impl ViolationResult {
    fn missing_location() -> Self {
        Self {
            violation: true,
            distance_m: None,
            radius_m: None,
            reason: Some(GeofenceReason::MissingLocation),
        }
    }
}

/// Checks inspection locations against center geofences
#[derive(Debug, Clone, Default)]
pub struct GeofenceEvaluator {
    config: GeofenceConfig,
}

impl GeofenceEvaluator {
    /// Create a new evaluator with given config
    pub fn new(config: GeofenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeofenceConfig {
        &self.config
    }

    /// Check a point against a center's radius.
    ///
    /// Absent or malformed coordinates on either side count as a violation.
    /// A distance equal to the radius is compliant.
    pub fn evaluate(&self, point: Option<&GeoPoint>, center: &CenterRecord) -> ViolationResult {
        let Some((point, center_location)) = self.locations(point, center) else {
            debug!("Missing location data for center {}", center.id);
            return ViolationResult::missing_location();
        };

        let distance_m = distance_between(center_location, point);
        let radius_m = self.effective_radius(center);
        // NaN fails closed
        let violation = distance_m.is_nan() || distance_m > radius_m;

        ViolationResult {
            violation,
            distance_m: Some(distance_m),
            radius_m: Some(radius_m),
            reason: violation.then_some(GeofenceReason::OutsideRadius { distance_m, radius_m }),
        }
    }

    /// Zone band of a point using the center's green/yellow radii.
    ///
    /// The green radius falls back to the geofence radius and the yellow
    /// radius to `yellow_zone_factor` times green. Returns `None` when
    /// location data is missing.
    pub fn zone_for(&self, point: Option<&GeoPoint>, center: &CenterRecord) -> Option<ZoneBand> {
        let (point, center_location) = self.locations(point, center)?;
        let distance = distance_between(center_location, point);

        let green = center
            .green_zone_radius_m
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or_else(|| self.effective_radius(center));
        let yellow = center
            .yellow_zone_radius_m
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(green * self.config.yellow_zone_factor);

        Some(classify_band(distance, green, yellow))
    }

    /// Radius configured on the center, or the default when absent or unusable
    pub fn effective_radius(&self, center: &CenterRecord) -> f64 {
        match center.radius_m {
            Some(r) if r.is_finite() && r > 0.0 => r,
            Some(r) => {
                warn!(
                    "Center {} has invalid radius {}, using default {}m",
                    center.id, r, self.config.default_radius_m
                );
                self.config.default_radius_m
            }
            None => self.config.default_radius_m,
        }
    }

    fn locations<'a>(
        &self,
        point: Option<&'a GeoPoint>,
        center: &'a CenterRecord,
    ) -> Option<(&'a GeoPoint, &'a GeoPoint)> {
        let point = point?.validated()?;
        let center_location = center.location.as_ref()?.validated()?;
        Some((point, center_location))
    }
}
