//! Compliance notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of compliance violation a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    Geofence,
    VehiclePresence,
}

impl ViolationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::Geofence => "geofence",
            ViolationType::VehiclePresence => "vehicle_presence",
        }
    }
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    #[default]
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Notification content produced by the engine, before the store assigns
/// identity and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    #[serde(rename = "type")]
    pub kind: ViolationType,
    pub severity: Severity,
    pub inspection_id: String,
    pub center_id: String,
    pub message: String,
}

/// A persisted compliance notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ViolationType,
    pub severity: Severity,
    pub inspection_id: String,
    pub center_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Materialize a draft with a fresh id, the current time and unread state
    pub fn from_draft(draft: NotificationDraft) -> Self {
        Self::from_draft_at(draft, Utc::now())
    }

    /// Materialize a draft at a fixed timestamp
    pub fn from_draft_at(draft: NotificationDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: draft.kind,
            severity: draft.severity,
            inspection_id: draft.inspection_id,
            center_id: draft.center_id,
            message: draft.message,
            timestamp,
            read: false,
        }
    }

    /// Whether this notification reports the given violation of the given inspection
    pub fn matches(&self, inspection_id: &str, kind: ViolationType) -> bool {
        self.kind == kind && self.inspection_id == inspection_id
    }
}
