//! Geographic coordinates

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90..=90)
    pub lat: f64,
    /// Longitude in degrees (-180..=180)
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and inside the WGS84 degree ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Returns the point only if it is usable for distance computation
    pub fn validated(&self) -> Option<&Self> {
        self.is_valid().then_some(self)
    }
}
