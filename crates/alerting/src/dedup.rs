//! Notification Deduplicator

use inspection_model::{Notification, ViolationType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Composite key identifying one violation of one inspection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey {
    pub inspection_id: String,
    pub kind: ViolationType,
}

impl DedupKey {
    pub fn new(inspection_id: impl Into<String>, kind: ViolationType) -> Self {
        Self {
            inspection_id: inspection_id.into(),
            kind,
        }
    }
}

/// Two-tier idempotency guard for notification emission.
///
/// The local key set is the fast path and lives as long as this value. The
/// externally supplied notification list is the durable source of truth and
/// covers keys emitted before a restart. Keys are never pruned.
#[derive(Debug, Default)]
pub struct NotificationDeduplicator {
    emitted: Mutex<HashSet<DedupKey>>,
}

impl NotificationDeduplicator {
    /// Create an empty deduplicator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deduplicator whose fast path already knows the given notifications
    pub fn seeded(existing: &[Notification]) -> Self {
        let dedup = Self::new();
        dedup.seed_from(existing);
        dedup
    }

    /// Decide whether a notification for this key may be emitted.
    ///
    /// Returns `false` if the key was already recorded locally or `existing`
    /// holds a notification for the same inspection and type. Otherwise the
    /// key is recorded and `true` is returned. Check and record happen under
    /// one lock, so concurrent callers never both win the same key.
    pub fn should_emit(
        &self,
        inspection_id: &str,
        kind: ViolationType,
        existing: &[Notification],
    ) -> bool {
        let key = DedupKey::new(inspection_id, kind);
        let mut emitted = self.lock();

        if emitted.contains(&key) {
            debug!("Notification suppressed: {} {} already emitted", inspection_id, kind);
            return false;
        }

        if existing.iter().any(|n| n.matches(inspection_id, kind)) {
            debug!("Notification suppressed: {} {} already stored", inspection_id, kind);
            return false;
        }

        emitted.insert(key);
        true
    }

    /// Record stored notifications in the local set
    pub fn seed_from(&self, existing: &[Notification]) {
        let mut emitted = self.lock();
        emitted.extend(
            existing
                .iter()
                .map(|n| DedupKey::new(n.inspection_id.clone(), n.kind)),
        );
        debug!("Deduplicator seeded, {} keys known", emitted.len());
    }

    /// Whether the key is recorded locally
    pub fn contains(&self, inspection_id: &str, kind: ViolationType) -> bool {
        self.lock().contains(&DedupKey::new(inspection_id, kind))
    }

    /// Drop a recorded key so the violation can be emitted again, e.g. after
    /// the sink failed to store it. Returns whether the key was present.
    pub fn forget(&self, inspection_id: &str, kind: ViolationType) -> bool {
        let removed = self.lock().remove(&DedupKey::new(inspection_id, kind));
        if removed {
            debug!("Forgot {} {}", inspection_id, kind);
        }
        removed
    }

    /// Number of locally recorded keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget all local keys, as a process restart would
    pub fn reset(&self) {
        let mut emitted = self.lock();
        info!("Resetting deduplicator ({} keys)", emitted.len());
        emitted.clear();
    }

    // A panic elsewhere cannot leave the set half-updated, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<DedupKey>> {
        self.emitted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
