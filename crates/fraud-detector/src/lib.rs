//! Inspection Fraud Detection
//!
//! Correlates two independent signals for one (inspection, center) pair:
//! - Geofence: was the inspection recorded at the center?
//! - Vehicle presence: is the recorded evidence complete?

use geofence::{GeofenceEvaluator, ViolationResult};
use inspection_model::{CenterRecord, InspectionRecord, ViolationType};
use presence_check::{PresenceAssessment, PresenceHeuristic};
use serde::{Deserialize, Serialize};

pub use geofence::GeofenceConfig;
pub use presence_check::PresenceConfig;

/// Combined assessment of one inspection against its center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    pub geofence: ViolationResult,
    pub vehicle_presence: PresenceAssessment,
}

impl FraudAssessment {
    pub fn has_violations(&self) -> bool {
        self.geofence.violation || self.vehicle_presence.violation
    }

    /// Violation kinds raised, geofence first
    pub fn violations(&self) -> impl Iterator<Item = ViolationType> + '_ {
        [
            (self.geofence.violation, ViolationType::Geofence),
            (self.vehicle_presence.violation, ViolationType::VehiclePresence),
        ]
        .into_iter()
        .filter_map(|(hit, kind)| hit.then_some(kind))
    }
}

/// Stateless fraud detector
#[derive(Debug, Clone, Default)]
pub struct FraudDetector {
    geofence: GeofenceEvaluator,
    presence: PresenceHeuristic,
}

impl FraudDetector {
    /// Create new detector
    pub fn new(geofence: GeofenceConfig, presence: PresenceConfig) -> Self {
        Self {
            geofence: GeofenceEvaluator::new(geofence),
            presence: PresenceHeuristic::new(presence),
        }
    }

    pub fn geofence(&self) -> &GeofenceEvaluator {
        &self.geofence
    }

    /// Assess an inspection against the center it claims
    pub fn detect(&self, inspection: &InspectionRecord, center: &CenterRecord) -> FraudAssessment {
        FraudAssessment {
            geofence: self.geofence.evaluate(inspection.geolocation.as_ref(), center),
            vehicle_presence: self.presence.evaluate(inspection),
        }
    }
}
