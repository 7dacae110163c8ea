use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geofence::{haversine_distance, GeofenceEvaluator};
use inspection_model::{CenterRecord, GeoPoint};

fn bench_haversine(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(9.0806),
                black_box(38.8578),
                black_box(8.9806),
                black_box(38.7578),
            )
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let evaluator = GeofenceEvaluator::default();
    let center =
        CenterRecord::new("c-1", "Bole", GeoPoint::new(8.9806, 38.7578)).with_radius(500.0);
    let point = GeoPoint::new(8.9810, 38.7581);

    c.bench_function("geofence_evaluate", |b| {
        b.iter(|| evaluator.evaluate(black_box(Some(&point)), black_box(&center)))
    });
}

criterion_group!(benches, bench_haversine, bench_evaluate);
criterion_main!(benches);
