//! Evidence completeness checks

use inspection_model::{GeoFenceStatus, InspectionRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PresenceConfig;

/// A single reason an inspection looks like the vehicle was absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PresenceReason {
    /// Visual-check list absent or empty
    NoVisualChecks,
    /// Too few visual checks carry a photo
    InsufficientPhotos { found: usize, required: usize },
    /// Machine-test list absent or empty
    NoMachineTests,
    /// Inspection finished faster than plausible
    ShortDuration { minutes: f64, minimum: f64 },
    /// Terminal reported an unusable geofence status
    GeofenceStatus(GeoFenceStatus),
}

impl std::fmt::Display for PresenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresenceReason::NoVisualChecks => f.write_str("No visual inspection results recorded"),
            PresenceReason::InsufficientPhotos { found, required } => write!(
                f,
                "Only {found} inspection photos attached (minimum {required})"
            ),
            PresenceReason::NoMachineTests => f.write_str("No machine test results recorded"),
            PresenceReason::ShortDuration { minutes, minimum } => write!(
                f,
                "Inspection completed in {minutes} minutes (minimum {minimum})"
            ),
            PresenceReason::GeofenceStatus(status) => {
                write!(f, "Geofence status reported as {status}")
            }
        }
    }
}

/// Result of the presence heuristic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresenceAssessment {
    pub violation: bool,
    pub reasons: Vec<PresenceReason>,
}

impl PresenceAssessment {
    /// Reasons rendered and joined for display
    pub fn summary(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Vehicle presence heuristic
#[derive(Debug, Clone, Default)]
pub struct PresenceHeuristic {
    config: PresenceConfig,
}

impl PresenceHeuristic {
    /// Create a new heuristic with given config
    pub fn new(config: PresenceConfig) -> Self {
        Self { config }
    }

    /// Run every check; each triggered check adds one reason
    pub fn evaluate(&self, inspection: &InspectionRecord) -> PresenceAssessment {
        let mut reasons = Vec::new();

        match inspection.visual_checks.as_deref() {
            None | Some([]) => reasons.push(PresenceReason::NoVisualChecks),
            Some(_) => {
                let found = inspection.photo_count();
                if found < self.config.min_photos {
                    reasons.push(PresenceReason::InsufficientPhotos {
                        found,
                        required: self.config.min_photos,
                    });
                }
            }
        }

        if inspection.machine_tests.as_ref().map_or(true, Vec::is_empty) {
            reasons.push(PresenceReason::NoMachineTests);
        }

        if let Some(minutes) = inspection.metadata.inspection_duration_min {
            if minutes < self.config.min_duration_min {
                reasons.push(PresenceReason::ShortDuration {
                    minutes,
                    minimum: self.config.min_duration_min,
                });
            }
        }

        if let Some(status @ (GeoFenceStatus::Invalid | GeoFenceStatus::Unknown)) =
            inspection.metadata.geo_fence_status
        {
            reasons.push(PresenceReason::GeofenceStatus(status));
        }

        if !reasons.is_empty() {
            debug!(
                "Inspection {} flagged for presence review: {} reason(s)",
                inspection.id,
                reasons.len()
            );
        }

        PresenceAssessment {
            violation: !reasons.is_empty(),
            reasons,
        }
    }
}
