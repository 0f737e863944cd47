//! Latency benchmarks for the forward resolver (spec.md §7 performance
//! budget: ≤1ms per `resolve()` call against a loaded in-memory index).
//! Built against a synthetic fixture rather than real Natural Earth data,
//! since no dataset ships with the crate; the budget is about the
//! candidate-selection pipeline's cost, not dataset size.

use criterion::{criterion_group, criterion_main, Criterion};
use geo_intel_core::model::{CountryRecord, Geometry, Polygon};
use geo_intel_core::pip::Ring;
use geo_intel_core::{resolver, Loader};
use std::collections::HashMap;

fn square(id: u32, min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> CountryRecord {
    let geometry = Geometry::Single(Polygon {
        exterior: Ring::from_points(&[
            (min_lat, min_lon),
            (min_lat, max_lon),
            (max_lat, max_lon),
            (max_lat, min_lon),
        ]),
        holes: vec![],
    });
    let bbox = geometry.bbox();
    CountryRecord {
        id,
        name: format!("Country{id}"),
        iso2: None,
        iso3: None,
        continent: "Testia".into(),
        timezone: "UTC".into(),
        centroid: bbox.map(|(a, b, c, d)| ((a + c) / 2.0, (b + d) / 2.0)),
        bbox,
        geometry: Some(geometry),
    }
}

fn fixture_loader() -> Loader {
    // A grid of 200 non-overlapping countries, roughly Natural Earth's
    // country count, spread across the globe.
    let mut records = Vec::new();
    let mut id = 0u32;
    for lat_band in -80..80i32 {
        if lat_band % 8 != 0 {
            continue;
        }
        for lon_band in -170..170i32 {
            if lon_band % 17 != 0 {
                continue;
            }
            records.push(square(
                id,
                lat_band as f64,
                lon_band as f64,
                lat_band as f64 + 4.0,
                lon_band as f64 + 4.0,
            ));
            id += 1;
            if id >= 200 {
                break;
            }
        }
        if id >= 200 {
            break;
        }
    }

    let mut geohash_index: HashMap<String, Vec<u32>> = HashMap::new();
    for r in &records {
        if let Some(geom) = &r.geometry {
            for hash in geo_intel_core::build::bucketize::bucket_geometry(geom, 6) {
                geohash_index.entry(hash).or_default().push(r.id);
            }
        }
    }
    Loader::from_parts(records, geohash_index)
}

fn bench_resolve(c: &mut Criterion) {
    let loader = fixture_loader();
    c.bench_function("resolve_hit", |b| {
        b.iter(|| resolver::resolve(&loader, 2.0, 2.0).unwrap())
    });
    c.bench_function("resolve_miss", |b| {
        b.iter(|| resolver::resolve(&loader, 89.5, -179.5).unwrap())
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
