//! Alerting System
//!
//! Guarantees each (inspection, violation type) pair produces at most one
//! compliance notification, across repeated scans and process restarts.

mod dedup;

pub use dedup::{DedupKey, NotificationDeduplicator};
