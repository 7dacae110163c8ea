//! Vehicle Presence Heuristic
//!
//! Flags inspections that may have been recorded without the vehicle on
//! site, based on how complete the recorded evidence is. The output only
//! raises a review flag, so false positives are acceptable.

mod config;
mod heuristic;

pub use config::PresenceConfig;
pub use heuristic::{PresenceAssessment, PresenceHeuristic, PresenceReason};
