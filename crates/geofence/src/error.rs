//! Geofence Error Types

use thiserror::Error;

/// Errors raised by strict geofence helpers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeofenceError {
    /// Threshold is NaN, infinite or negative
    #[error("{field} threshold {value} is not a valid distance")]
    InvalidThreshold { field: &'static str, value: f64 },

    /// Inner threshold exceeds outer threshold
    #[error("green radius {green}m exceeds yellow radius {yellow}m")]
    InvertedZones { green: f64, yellow: f64 },
}
