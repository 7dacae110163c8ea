//! Scanner configuration

use fraud_detector::{GeofenceConfig, PresenceConfig};
use inspection_model::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::ScanError;

/// How inspections are matched to centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterMatching {
    /// Match on the stable center id only
    #[default]
    IdOnly,
    /// Match on id; inspections without one fall back to an unambiguous
    /// center name
    IdThenName,
}

/// Scanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub center_matching: CenterMatching,

    /// Severity assigned to emitted notifications
    pub severity: Severity,

    pub geofence: GeofenceConfig,

    pub presence: PresenceConfig,
}

impl ScanConfig {
    /// Load configuration from an optional file, then `COMPLIANCE__*`
    /// environment variables (e.g. `COMPLIANCE__GEOFENCE__DEFAULT_RADIUS_M`).
    pub fn load(path: Option<&Path>) -> Result<Self, ScanError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            info!("Loading scan config from {}", path.display());
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix("COMPLIANCE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Legacy behavior: name fallback for inspections without a center id
    pub fn legacy() -> Self {
        Self {
            center_matching: CenterMatching::IdThenName,
            ..Default::default()
        }
    }
}
