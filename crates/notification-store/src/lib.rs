//! Notification Store
//!
//! Reference implementation of the notification-store collaborator: assigns
//! identity, timestamp and read state to drafts and keeps the records the
//! deduplicator consults.

mod store;

pub use store::{NotificationSink, NotificationStore};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("Notification not found: {0}")]
    NotFound(uuid::Uuid),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
