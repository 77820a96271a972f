use chrono::DateTime;
use criterion::{criterion_group, criterion_main, Criterion};
use geo::{Distance, Geodesic, Haversine};
use std::hint::black_box;
use workout_kit::models::{Route, RouteLocation};
use workout_kit::services::route::annotate_locations;

/// A two-hour run sampled once per second, wandering around a loop.
fn synthetic_track(count: usize) -> Vec<RouteLocation> {
    (0..count)
        .map(|i| {
            let t = i as f64 / count as f64 * std::f64::consts::TAU;
            RouteLocation::new(
                37.3320 + 0.02 * t.sin(),
                -122.0870 + 0.03 * t.cos(),
                DateTime::from_timestamp(1_717_225_200 + i as i64, 0).expect("valid timestamp"),
            )
        })
        .collect()
}

fn benchmark_annotate_locations(c: &mut Criterion) {
    let locations = synthetic_track(7200);

    let mut group = c.benchmark_group("annotate_locations");

    group.bench_function("geodesic", |b| {
        b.iter(|| {
            annotate_locations(black_box(locations.clone()), |from, to| {
                Geodesic.distance(from.point(), to.point())
            })
        })
    });

    group.bench_function("haversine", |b| {
        b.iter(|| {
            annotate_locations(black_box(locations.clone()), |from, to| {
                Haversine.distance(from.point(), to.point())
            })
        })
    });

    group.finish();
}

fn benchmark_geojson_export(c: &mut Criterion) {
    let locations = annotate_locations(synthetic_track(7200), |a, b| {
        Geodesic.distance(a.point(), b.point())
    });
    let route = Route {
        workout_id: "bench".to_string(),
        sync_identifier: None,
        sync_version: None,
        locations,
    };

    c.bench_function("route_to_geojson_feature", |b| {
        b.iter(|| black_box(&route).to_geojson_feature())
    });
}

criterion_group!(benches, benchmark_annotate_locations, benchmark_geojson_export);
criterion_main!(benches);
