//! Inspection Compliance Data Model
//!
//! Records exchanged between the compliance engine and its collaborators:
//! - Inspection records with location and evidence
//! - Inspection centers with geofence radii
//! - Compliance notifications

mod center;
mod inspection;
mod location;
mod notification;

pub use center::CenterRecord;
pub use inspection::{
    GeoFenceStatus, InspectionMetadata, InspectionRecord, MachineTest, VisualCheck,
};
pub use location::GeoPoint;
pub use notification::{Notification, NotificationDraft, Severity, ViolationType};
