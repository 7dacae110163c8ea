//! Geofence Evaluation
//!
//! Provides great-circle distance, geofence radius checks, and three-tier
//! zone classification for inspection locations.

mod config;
mod distance;
mod error;
mod evaluator;
mod zone;

pub use config::GeofenceConfig;
pub use distance::{distance_between, haversine_distance, EARTH_RADIUS_M};
pub use error::GeofenceError;
pub use evaluator::{GeofenceEvaluator, GeofenceReason, ViolationResult};
pub use zone::{classify_band, try_classify_band, ZoneBand};
