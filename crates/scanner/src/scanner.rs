//! Batch Scanner Implementation

use alerting::NotificationDeduplicator;
use fraud_detector::{FraudAssessment, FraudDetector};
use inspection_model::{
    CenterRecord, InspectionRecord, Notification, NotificationDraft, Severity, ViolationType,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{CancellationFlag, CenterIndex, ScanConfig, ScanError};

/// Summary of one scan pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Inspections evaluated against a resolved center
    pub evaluated: usize,
    /// Inspections dropped because no center resolved
    pub skipped: usize,
    /// Violations found, including already-notified ones
    pub violations: usize,
    /// Notifications handed to the sink
    pub emitted: usize,
    /// Violations suppressed as duplicates
    pub suppressed: usize,
    /// Scan stopped early on cancellation
    pub cancelled: bool,
}

impl ScanReport {
    fn merge(&mut self, other: &ScanReport) {
        self.evaluated += other.evaluated;
        self.skipped += other.skipped;
        self.violations += other.violations;
        self.emitted += other.emitted;
        self.suppressed += other.suppressed;
        self.cancelled |= other.cancelled;
    }
}

/// Per-inspection detection and dedup, shared by sequential and concurrent scans
#[derive(Clone)]
struct ScanWorker {
    detector: FraudDetector,
    dedup: Arc<NotificationDeduplicator>,
    severity: Severity,
}

impl ScanWorker {
    fn process(
        &self,
        inspection: &InspectionRecord,
        center: &CenterRecord,
        existing: &[Notification],
        report: &mut ScanReport,
        mut emit: impl FnMut(NotificationDraft),
    ) {
        for draft in self.candidates(inspection, center, report) {
            if self.admit(&draft, existing, report) {
                emit(draft);
            }
        }
    }

    /// Drafts for every violation of one inspection, before dedup
    fn candidates(
        &self,
        inspection: &InspectionRecord,
        center: &CenterRecord,
        report: &mut ScanReport,
    ) -> Vec<NotificationDraft> {
        let assessment = self.detector.detect(inspection, center);
        report.evaluated += 1;

        assessment
            .violations()
            .map(|kind| {
                report.violations += 1;
                NotificationDraft {
                    kind,
                    severity: self.severity,
                    inspection_id: inspection.id.clone(),
                    center_id: center.id.clone(),
                    message: render_message(kind, inspection, center, &assessment),
                }
            })
            .collect()
    }

    /// Record the draft's key, returning false for duplicates
    fn admit(
        &self,
        draft: &NotificationDraft,
        existing: &[Notification],
        report: &mut ScanReport,
    ) -> bool {
        if !self.dedup.should_emit(&draft.inspection_id, draft.kind, existing) {
            report.suppressed += 1;
            return false;
        }

        debug!("Emitting {} notification for inspection {}", draft.kind, draft.inspection_id);
        metrics::counter!("compliance_notifications_emitted_total", "kind" => draft.kind.as_str())
            .increment(1);
        report.emitted += 1;
        true
    }
}

/// Worker tasks of one concurrent scan, aborted when dropped
struct WorkerTasks(Vec<JoinHandle<ScanReport>>);

impl Drop for WorkerTasks {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

fn render_message(
    kind: ViolationType,
    inspection: &InspectionRecord,
    center: &CenterRecord,
    assessment: &FraudAssessment,
) -> String {
    match kind {
        ViolationType::Geofence => {
            let reason = assessment
                .geofence
                .reason
                .map(|r| r.to_string())
                .unwrap_or_default();
            format!(
                "Geofence violation for vehicle {} at {}: {}",
                inspection.vehicle_plate, center.name, reason
            )
        }
        ViolationType::VehiclePresence => format!(
            "Possible vehicle absence for vehicle {} at {}: {}",
            inspection.vehicle_plate,
            center.name,
            assessment.vehicle_presence.summary()
        ),
    }
}

/// Scans inspection batches and emits deduplicated notifications
pub struct BatchScanner {
    worker: ScanWorker,
    config: ScanConfig,
    cancel: CancellationFlag,
}

impl BatchScanner {
    /// Create a scanner sharing the given deduplicator
    pub fn new(config: ScanConfig, dedup: Arc<NotificationDeduplicator>) -> Self {
        info!("Creating batch scanner with config: {:?}", config);
        Self {
            worker: ScanWorker {
                detector: FraudDetector::new(config.geofence.clone(), config.presence.clone()),
                dedup,
                severity: config.severity,
            },
            config,
            cancel: CancellationFlag::new(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn dedup(&self) -> &Arc<NotificationDeduplicator> {
        &self.worker.dedup
    }

    /// Flag that stops running scans; clones share state with the scanner
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Scan inspections sequentially, calling `emit` once per new violation.
    ///
    /// Inspections whose center cannot be resolved are skipped. `existing`
    /// is the store's current notification list, consulted for dedup only.
    pub fn scan<F>(
        &self,
        inspections: &[InspectionRecord],
        centers: &[CenterRecord],
        existing: &[Notification],
        mut emit: F,
    ) -> ScanReport
    where
        F: FnMut(NotificationDraft),
    {
        metrics::counter!("compliance_scans_total").increment(1);
        let index = CenterIndex::new(centers, self.config.center_matching);
        let mut report = ScanReport::default();

        for inspection in inspections {
            if self.cancel.is_cancelled() {
                warn!("Scan cancelled after {} inspections", report.evaluated + report.skipped);
                report.cancelled = true;
                break;
            }

            let Some(center) = index.resolve(inspection) else {
                debug!("No center for inspection {}, skipping", inspection.id);
                metrics::counter!("compliance_inspections_skipped_total").increment(1);
                report.skipped += 1;
                continue;
            };

            self.worker
                .process(inspection, center, existing, &mut report, &mut emit);
        }

        info!(
            "Scan complete: {} evaluated, {} skipped, {} emitted, {} suppressed",
            report.evaluated, report.skipped, report.emitted, report.suppressed
        );
        report
    }

    /// Scan with one tokio task per center.
    ///
    /// Workers run detection and send candidate drafts over a channel to a
    /// single writer, which makes the dedup decision and calls `emit`.
    /// Dropping the returned future aborts the workers. Must run inside a
    /// tokio runtime.
    pub async fn scan_concurrent<F>(
        &self,
        inspections: Vec<InspectionRecord>,
        centers: &[CenterRecord],
        existing: &[Notification],
        mut emit: F,
    ) -> Result<ScanReport, ScanError>
    where
        F: FnMut(NotificationDraft),
    {
        metrics::counter!("compliance_scans_total").increment(1);
        let mut report = ScanReport::default();

        let index = CenterIndex::new(centers, self.config.center_matching);
        let mut groups: HashMap<&str, (&CenterRecord, Vec<InspectionRecord>)> = HashMap::new();
        for inspection in inspections {
            match index.resolve(&inspection) {
                Some(center) => groups
                    .entry(center.id.as_str())
                    .or_insert_with(|| (center, Vec::new()))
                    .1
                    .push(inspection),
                None => {
                    debug!("No center for inspection {}, skipping", inspection.id);
                    metrics::counter!("compliance_inspections_skipped_total").increment(1);
                    report.skipped += 1;
                }
            }
        }

        let (tx, mut rx) = mpsc::channel::<NotificationDraft>(256);
        let mut workers = WorkerTasks(Vec::with_capacity(groups.len()));

        for (center, group) in groups.into_values() {
            let center = center.clone();
            let worker = self.worker.clone();
            let cancel = self.cancel.clone();
            let tx = tx.clone();

            workers.0.push(tokio::spawn(async move {
                let mut partial = ScanReport::default();

                for inspection in &group {
                    if cancel.is_cancelled() {
                        partial.cancelled = true;
                        break;
                    }
                    for draft in worker.candidates(inspection, &center, &mut partial) {
                        if tx.send(draft).await.is_err() {
                            warn!("Notification writer closed, stopping worker for {}", center.id);
                            partial.cancelled = true;
                            return partial;
                        }
                    }
                }
                partial
            }));
        }
        drop(tx);

        while let Some(draft) = rx.recv().await {
            if self.worker.admit(&draft, existing, &mut report) {
                emit(draft);
            }
        }

        for handle in workers.0.iter_mut() {
            let partial = handle.await.map_err(|e| ScanError::Worker(e.to_string()))?;
            report.merge(&partial);
        }

        if report.cancelled {
            warn!("Concurrent scan cancelled");
        }
        info!(
            "Concurrent scan complete: {} evaluated, {} skipped, {} emitted, {} suppressed",
            report.evaluated, report.skipped, report.emitted, report.suppressed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspection_model::{GeoFenceStatus, GeoPoint, MachineTest, VisualCheck};

    fn center() -> CenterRecord {
        CenterRecord::new("c-1", "Bole Center", GeoPoint::new(8.9806, 38.7578)).with_radius(500.0)
    }

    fn compliant(id: &str) -> InspectionRecord {
        let mut inspection = InspectionRecord::new(id, "AA-3-22222");
        inspection.center_id = Some("c-1".into());
        inspection.geolocation = Some(GeoPoint::new(8.9807, 38.7579));
        inspection.visual_checks = Some(
            (0..3)
                .map(|i| VisualCheck {
                    item: format!("item-{i}"),
                    passed: true,
                    photo: Some(format!("{id}-{i}.jpg")),
                })
                .collect(),
        );
        inspection.machine_tests = Some(vec![MachineTest {
            test: "Brake efficiency".into(),
            value: Some(55.0),
            passed: true,
        }]);
        inspection.metadata.inspection_duration_min = Some(20.0);
        inspection.metadata.geo_fence_status = Some(GeoFenceStatus::Valid);
        inspection
    }

    fn far_away(id: &str) -> InspectionRecord {
        let mut inspection = compliant(id);
        inspection.geolocation = Some(GeoPoint::new(9.0806, 38.8578));
        inspection
    }

    fn scanner() -> BatchScanner {
        BatchScanner::new(ScanConfig::default(), Arc::new(NotificationDeduplicator::new()))
    }

    #[test]
    fn test_compliant_batch_emits_nothing() {
        let mut emitted = Vec::new();
        let report = scanner().scan(&[compliant("a"), compliant("b")], &[center()], &[], |d| {
            emitted.push(d)
        });

        assert!(emitted.is_empty());
        assert_eq!(report.evaluated, 2);
        assert_eq!(report.violations, 0);
    }

    #[test]
    fn test_geofence_violation_message() {
        let mut emitted = Vec::new();
        scanner().scan(&[far_away("a")], &[center()], &[], |d| emitted.push(d));

        assert_eq!(emitted.len(), 1);
        let draft = &emitted[0];
        assert_eq!(draft.kind, ViolationType::Geofence);
        assert_eq!(draft.severity, Severity::High);
        assert_eq!(draft.center_id, "c-1");
        assert!(draft.message.contains("allowed radius: 500m"));
    }

    #[test]
    fn test_presence_message_joins_reasons() {
        let mut inspection = compliant("a");
        inspection.visual_checks = Some(Vec::new());
        inspection.machine_tests = None;

        let mut emitted = Vec::new();
        scanner().scan(&[inspection], &[center()], &[], |d| emitted.push(d));

        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].kind, ViolationType::VehiclePresence);
        assert!(emitted[0]
            .message
            .ends_with("No visual inspection results recorded; No machine test results recorded"));
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let scanner = scanner();
        let batch = [far_away("a"), far_away("b")];
        let mut emitted = Vec::new();

        let first = scanner.scan(&batch, &[center()], &[], |d| emitted.push(d));
        let second = scanner.scan(&batch, &[center()], &[], |d| emitted.push(d));

        assert_eq!(first.emitted, 2);
        assert_eq!(second.emitted, 0);
        assert_eq!(second.suppressed, 2);
        assert_eq!(emitted.len(), 2);
    }

    #[test]
    fn test_unresolved_center_skipped() {
        let mut inspection = far_away("a");
        inspection.center_id = Some("missing".into());

        let mut emitted = Vec::new();
        let report = scanner().scan(&[inspection], &[center()], &[], |d| emitted.push(d));

        assert!(emitted.is_empty());
        assert_eq!(report.skipped, 1);
        assert_eq!(report.evaluated, 0);
    }

    #[test]
    fn test_cancelled_scan_stops() {
        let scanner = scanner();
        scanner.cancellation().cancel();

        let mut emitted = Vec::new();
        let report = scanner.scan(&[far_away("a")], &[center()], &[], |d| emitted.push(d));

        assert!(report.cancelled);
        assert!(emitted.is_empty());

        scanner.cancellation().reset();
        let report = scanner.scan(&[far_away("a")], &[center()], &[], |d| emitted.push(d));
        assert!(!report.cancelled);
        assert_eq!(emitted.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scan_matches_sequential() {
        let centers = vec![
            center(),
            CenterRecord::new("c-2", "Kality Center", GeoPoint::new(8.9000, 38.7700))
                .with_radius(300.0),
        ];
        let mut inspections: Vec<_> = (0..20).map(|i| far_away(&format!("insp-{i}"))).collect();
        for inspection in inspections.iter_mut().skip(10) {
            inspection.center_id = Some("c-2".into());
            inspection.machine_tests = None;
        }
        let mut orphan = far_away("orphan");
        orphan.center_id = None;
        inspections.push(orphan);

        let scanner = scanner();
        let mut emitted = Vec::new();
        let report = scanner
            .scan_concurrent(inspections.clone(), &centers, &[], |d| emitted.push(d))
            .await
            .unwrap();

        // 20 geofence + 10 presence
        assert_eq!(emitted.len(), 30);
        assert_eq!(report.emitted, 30);
        assert_eq!(report.evaluated, 20);
        assert_eq!(report.skipped, 1);

        // Sequential rescan through the same deduplicator finds nothing new
        let again = scanner.scan(&inspections, &centers, &[], |d| emitted.push(d));
        assert_eq!(again.emitted, 0);
        assert_eq!(emitted.len(), 30);
    }

    #[tokio::test]
    async fn test_dropped_concurrent_scan_loses_nothing() {
        let scanner = scanner();
        let mut inspection = far_away("a");
        inspection.machine_tests = None;
        let batch = vec![inspection];

        let mut emitted = Vec::new();
        let centers = [center()];
        tokio::select! {
            biased;
            _ = scanner.scan_concurrent(batch.clone(), &centers, &[], |d| emitted.push(d)) => {
                panic!("scan finished before its workers ran");
            }
            _ = std::future::ready(()) => {}
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(emitted.is_empty());
        assert!(scanner.dedup().is_empty());

        let report = scanner
            .scan_concurrent(batch, &[center()], &[], |d| emitted.push(d))
            .await
            .unwrap();
        assert_eq!(report.emitted, 2);
        assert_eq!(report.suppressed, 0);
        assert_eq!(emitted.len(), 2);
    }
}
