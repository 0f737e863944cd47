//! Offline build pipeline (spec.md §4.6): GeoJSON in, artifact files out.
//! Gated behind the `builder` feature so query-only consumers don't pay for
//! the ingest/simplify/write path. Mirrors the teacher's own builder in
//! spirit — a plain synchronous pipeline narrated with `println!`, no
//! logging facade, timed with [`std::time::Instant`].

pub mod bucketize;
pub mod ingest;
pub mod simplify;
pub mod writer;

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

/// End-to-end build: ingest -> simplify -> recompute centroid/bbox ->
/// bucketize -> write. `tolerance` is the Douglas-Peucker threshold in
/// degrees; `precision` is the geohash bucket precision (spec.md defaults
/// to 0.005 and 6 respectively).
pub fn build(
    input_geojson: &str,
    output_dir: &Path,
    tolerance: f64,
    precision: usize,
    keep_uncompressed: bool,
) -> Result<BuildReport> {
    let started = Instant::now();

    println!("Ingesting {} features from GeoJSON", count_features(input_geojson));
    let ingested = ingest::ingest_geojson(input_geojson)?;
    let mut records = ingest::into_records(ingested);

    println!("Simplifying {} geometries (tolerance={tolerance})", records.len());
    for record in &mut records {
        if let Some(geometry) = &record.geometry {
            let simplified = simplify::simplify_geometry(geometry, tolerance);
            record.bbox = simplified.bbox();
            record.centroid = simplified.centroid();
            record.geometry = Some(simplified);
        }
    }
    records.retain(|r| r.is_indexable());

    println!("Bucketizing at geohash precision {precision}");
    let mut geohash_index: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for record in &records {
        if let Some(geometry) = &record.geometry {
            for hash in bucketize::bucket_geometry(geometry, precision) {
                geohash_index.entry(hash).or_default().push(record.id);
            }
        }
    }
    for ids in geohash_index.values_mut() {
        ids.sort_unstable();
        ids.dedup();
    }

    println!("Writing artifacts to {}", output_dir.display());
    writer::write_artifacts(output_dir, &records, &geohash_index, keep_uncompressed)?;

    let elapsed = started.elapsed();
    println!("Build complete in {elapsed:.2?}: {} countries, {} buckets", records.len(), geohash_index.len());

    Ok(BuildReport {
        countries: records.len(),
        buckets: geohash_index.len(),
        elapsed,
    })
}

/// Summary printed by the CLI's `build` subcommand.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub countries: usize,
    pub buckets: usize,
    pub elapsed: std::time::Duration,
}

fn count_features(source: &str) -> usize {
    serde_json::from_str::<serde_json::Value>(source)
        .ok()
        .and_then(|v| v.get("features").and_then(|f| f.as_array().map(|a| a.len())))
        .unwrap_or(0)
}
