//! Inspection records

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// Geofence status recorded by the inspection terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeoFenceStatus {
    Valid,
    Invalid,
    Unknown,
}

impl GeoFenceStatus {
    /// Status string as stored by the terminal
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoFenceStatus::Valid => "Valid",
            GeoFenceStatus::Invalid => "Invalid",
            GeoFenceStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for GeoFenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single visual check item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualCheck {
    /// Check item name (e.g. "Headlights")
    pub item: String,
    /// Whether the item passed
    #[serde(default)]
    pub passed: bool,
    /// Reference to the photo taken as evidence
    #[serde(default)]
    pub photo: Option<String>,
}

impl VisualCheck {
    /// Whether a non-empty photo reference is attached
    pub fn has_photo(&self) -> bool {
        self.photo.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

/// Result of a machine test (brake tester, emissions analyzer, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineTest {
    /// Test name
    pub test: String,
    /// Measured value, if the device reported one
    #[serde(default)]
    pub value: Option<f64>,
    /// Whether the measurement passed
    #[serde(default)]
    pub passed: bool,
}

/// Terminal-side metadata about the inspection session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionMetadata {
    #[serde(default)]
    pub geo_fence_status: Option<GeoFenceStatus>,
    /// Session length in minutes
    #[serde(default, rename = "inspectionDuration")]
    pub inspection_duration_min: Option<f64>,
}

/// A single vehicle inspection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    pub id: String,
    pub vehicle_plate: String,
    /// Stable identifier of the center that performed the inspection
    #[serde(default)]
    pub center_id: Option<String>,
    /// Display name of the center (legacy exports carry only this)
    #[serde(default)]
    pub center_name: Option<String>,
    #[serde(default)]
    pub geolocation: Option<GeoPoint>,
    #[serde(default)]
    pub visual_checks: Option<Vec<VisualCheck>>,
    #[serde(default)]
    pub machine_tests: Option<Vec<MachineTest>>,
    #[serde(default)]
    pub metadata: InspectionMetadata,
}

impl InspectionRecord {
    /// Create a bare inspection with no evidence attached
    pub fn new(id: impl Into<String>, vehicle_plate: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vehicle_plate: vehicle_plate.into(),
            ..Default::default()
        }
    }

    /// Number of visual checks carrying a photo reference
    pub fn photo_count(&self) -> usize {
        self.visual_checks
            .as_ref()
            .map_or(0, |checks| checks.iter().filter(|c| c.has_photo()).count())
    }
}
