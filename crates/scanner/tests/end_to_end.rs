//! End-to-end scans against the in-memory notification store

use alerting::NotificationDeduplicator;
use fixtures::*;
use inspection_model::{InspectionRecord, ViolationType};
use notification_store::{NotificationSink, NotificationStore};
use scanner::{BatchScanner, ScanConfig};
use std::sync::Arc;

mod fixtures {
    use inspection_model::{
        CenterRecord, GeoFenceStatus, GeoPoint, InspectionRecord, MachineTest, VisualCheck,
    };

    pub fn addis_center() -> CenterRecord {
        CenterRecord::new("c-addis", "Addis Ababa Center", GeoPoint::new(8.9806, 38.7578))
            .with_radius(500.0)
    }

    pub fn remote_inspection(id: &str) -> InspectionRecord {
        let mut inspection = InspectionRecord::new(id, "AA-3-B45678");
        inspection.center_id = Some("c-addis".into());
        inspection.geolocation = Some(GeoPoint::new(9.0806, 38.8578));
        inspection.visual_checks = Some(
            ["Headlights", "Tyres", "Windshield"]
                .iter()
                .map(|item| VisualCheck {
                    item: item.to_string(),
                    passed: true,
                    photo: Some(format!("{id}-{item}.jpg")),
                })
                .collect(),
        );
        inspection.machine_tests = Some(vec![MachineTest {
            test: "Emissions".into(),
            value: Some(0.4),
            passed: true,
        }]);
        inspection.metadata.inspection_duration_min = Some(25.0);
        inspection.metadata.geo_fence_status = Some(GeoFenceStatus::Valid);
        inspection
    }
}

fn fresh_scanner(config: ScanConfig) -> BatchScanner {
    BatchScanner::new(config, Arc::new(NotificationDeduplicator::new()))
}

fn run_scan(
    scanner: &BatchScanner,
    store: &NotificationStore,
    inspections: &[InspectionRecord],
) -> usize {
    let existing = store.snapshot().unwrap();
    let report = scanner.scan(inspections, &[addis_center()], &existing, |draft| {
        store.emit(draft).unwrap();
    });
    report.emitted
}

#[test]
fn geofence_violation_end_to_end() {
    let store = NotificationStore::new();
    let scanner = fresh_scanner(ScanConfig::default());

    assert_eq!(run_scan(&scanner, &store, &[remote_inspection("insp-100")]), 1);

    let stored = store.snapshot().unwrap();
    assert_eq!(stored.len(), 1);
    let notification = &stored[0];
    assert_eq!(notification.kind, ViolationType::Geofence);
    assert_eq!(notification.center_id, "c-addis");
    assert!(!notification.read);

    // ~15.6km by haversine
    let distance = geofence::haversine_distance(8.9806, 38.7578, 9.0806, 38.8578);
    assert!(distance > 15_000.0 && distance < 16_000.0);
    assert!(notification.message.contains(&format!("{}m", distance.round() as i64)));
    assert!(notification.message.contains("500m"));
}

#[test]
fn repeated_scans_are_idempotent() {
    let store = NotificationStore::new();
    let scanner = fresh_scanner(ScanConfig::default());
    let batch = vec![remote_inspection("insp-1"), remote_inspection("insp-2")];

    assert_eq!(run_scan(&scanner, &store, &batch), 2);
    assert_eq!(run_scan(&scanner, &store, &batch), 0);
    assert_eq!(run_scan(&scanner, &store, &batch[..1]), 0);
    assert_eq!(store.len(), 2);
}

#[test]
fn restart_relies_on_stored_notifications() {
    let store = NotificationStore::new();
    let batch = vec![remote_inspection("insp-1")];

    let first = fresh_scanner(ScanConfig::default());
    assert_eq!(run_scan(&first, &store, &batch), 1);

    // Fresh process: empty local set, same store
    let restarted = fresh_scanner(ScanConfig::default());
    assert_eq!(run_scan(&restarted, &store, &batch), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn unresolved_center_emits_nothing() {
    let store = NotificationStore::new();
    let scanner = fresh_scanner(ScanConfig::default());

    let mut orphan = remote_inspection("insp-orphan");
    orphan.center_id = None;
    orphan.center_name = Some("Addis Ababa Center".into());

    assert_eq!(run_scan(&scanner, &store, &[orphan.clone()]), 0);
    assert!(store.is_empty());

    // Legacy name matching resolves the same inspection
    let legacy = fresh_scanner(ScanConfig::legacy());
    assert_eq!(run_scan(&legacy, &store, &[orphan]), 1);
}

#[tokio::test]
async fn concurrent_scan_feeds_store() {
    let store = NotificationStore::new();
    let scanner = fresh_scanner(ScanConfig::default());
    let batch: Vec<_> = (0..5).map(|i| remote_inspection(&format!("insp-{i}"))).collect();

    let existing = store.snapshot().unwrap();
    let report = scanner
        .scan_concurrent(batch.clone(), &[addis_center()], &existing, |draft| {
            store.emit(draft).unwrap();
        })
        .await
        .unwrap();

    assert_eq!(report.emitted, 5);
    assert_eq!(store.list(Some(ViolationType::Geofence), 10).unwrap().len(), 5);
    assert_eq!(run_scan(&scanner, &store, &batch), 0);
}
