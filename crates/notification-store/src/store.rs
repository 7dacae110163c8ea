//! Store Implementation

use crate::StoreError;
use chrono::Utc;
use inspection_model::{Notification, NotificationDraft, ViolationType};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// Receiver of notification drafts produced by a scan
pub trait NotificationSink {
    /// Persist a draft, returning the stored record
    fn emit(&self, draft: NotificationDraft) -> Result<Notification, StoreError>;
}

/// In-memory notification store
pub struct NotificationStore {
    notifications: Mutex<Vec<Notification>>,
}

impl NotificationStore {
    /// Create an empty store
    pub fn new() -> Self {
        info!("Creating in-memory notification store");
        Self {
            notifications: Mutex::new(Vec::with_capacity(256)),
        }
    }

    /// Load a store from a JSON snapshot; a missing file yields an empty store
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No snapshot at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let bytes = std::fs::read(path)?;
        let notifications: Vec<Notification> = serde_json::from_slice(&bytes)?;
        info!("Loaded {} notifications from {}", notifications.len(), path.display());

        Ok(Self {
            notifications: Mutex::new(notifications),
        })
    }

    /// Write all notifications to a JSON snapshot
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let snapshot = self.snapshot()?;
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        std::fs::write(path.as_ref(), bytes)?;
        debug!("Saved {} notifications to {}", snapshot.len(), path.as_ref().display());
        Ok(())
    }

    /// Store a draft with a fresh id, current timestamp and unread state
    pub fn insert(&self, draft: NotificationDraft) -> Result<Notification, StoreError> {
        let mut notifications = self.lock()?;
        let notification = Notification::from_draft_at(draft, Utc::now());
        debug!(
            "Stored {} notification {} for inspection {}",
            notification.kind, notification.id, notification.inspection_id
        );
        notifications.push(notification.clone());
        Ok(notification)
    }

    /// Copy of every stored notification, oldest first
    pub fn snapshot(&self) -> Result<Vec<Notification>, StoreError> {
        Ok(self.lock()?.clone())
    }

    /// Most recent notifications, optionally filtered by type
    pub fn list(
        &self,
        kind: Option<ViolationType>,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        let notifications = self.lock()?;

        Ok(notifications
            .iter()
            .rev()
            .filter(|n| kind.map_or(true, |k| n.kind == k))
            .take(limit)
            .cloned()
            .collect())
    }

    /// Unread notifications, most recent first
    pub fn unread(&self) -> Result<Vec<Notification>, StoreError> {
        let notifications = self.lock()?;
        Ok(notifications.iter().rev().filter(|n| !n.read).cloned().collect())
    }

    /// Mark a notification as read
    pub fn mark_read(&self, id: Uuid) -> Result<(), StoreError> {
        let mut notifications = self.lock()?;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NotFound(id))?;
        notification.read = true;
        Ok(())
    }

    /// Get total notification count
    pub fn len(&self) -> usize {
        self.notifications.lock().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all data (for testing)
    pub fn clear(&self) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.clear();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Notification>>, StoreError> {
        self.notifications
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl NotificationSink for NotificationStore {
    fn emit(&self, draft: NotificationDraft) -> Result<Notification, StoreError> {
        self.insert(draft)
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
