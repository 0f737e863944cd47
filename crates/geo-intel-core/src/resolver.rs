//! Forward resolver: coordinate -> country (spec.md §4.4).
//!
//! Candidate selection is geohash bucket -> (optional neighbor widen) ->
//! PIP filter -> disambiguation; the confidence score is derived from which
//! of those branches fired, then adjusted for neighborhood disagreement.
//! Pure over the loader's state — no I/O, no shared mutable state.

use crate::error::{GeoError, Result};
use crate::geohash;
use crate::loader::Loader;
use crate::model::{CountryRecord, ForwardResult};

pub fn resolve(loader: &Loader, lat: f64, lon: f64) -> Result<ForwardResult> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(GeoError::InvalidCoordinate { lat, lon });
    }

    let hash = geohash::encode(lat, lon, geohash::DEFAULT_PRECISION)?;
    let exact_cell = loader.bucket(&hash);
    let exact_cell_len = exact_cell.len();

    let mut candidates: Vec<u32> = exact_cell.to_vec();
    let mut widened = false;
    if candidates.is_empty() {
        candidates = neighbor_union(loader, &hash)?;
        widened = true;
    }

    if candidates.is_empty() {
        return Ok(ForwardResult::empty());
    }

    let mut matches = pip_filter(loader, &candidates, lat, lon);

    if matches.is_empty() && !widened {
        // Retry once with the neighbor-widened candidate set.
        candidates = neighbor_union(loader, &hash)?;
        matches = pip_filter(loader, &candidates, lat, lon);
        widened = true;
    }

    if matches.is_empty() {
        return Ok(best_effort_fallback(loader, &hash, &candidates));
    }

    let (winner, base_confidence) = if matches.len() == 1 {
        let winner = matches[0];
        let base = if widened {
            0.50
        } else if exact_cell_len <= 1 {
            1.0
        } else {
            0.85
        };
        (winner, base)
    } else {
        (smallest_bbox_tie_break(loader, &matches), 0.70)
    };

    let record = loader
        .get_metadata(winner)
        .expect("candidate id must resolve to a loaded record");

    let confidence = apply_neighborhood_penalty(loader, &hash, winner, base_confidence);
    Ok(ForwardResult::from_record(record, confidence))
}

fn neighbor_union(loader: &Loader, hash: &str) -> Result<Vec<u32>> {
    let mut ids: Vec<u32> = Vec::new();
    for n in geohash::neighbors(hash)? {
        ids.extend_from_slice(loader.bucket(&n));
    }
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

fn pip_filter(loader: &Loader, candidates: &[u32], lat: f64, lon: f64) -> Vec<u32> {
    candidates
        .iter()
        .copied()
        .filter(|&id| {
            loader
                .get_polygon(id)
                .is_some_and(|geom| geom.contains(lat, lon))
        })
        .collect()
}

fn smallest_bbox_tie_break(loader: &Loader, ids: &[u32]) -> u32 {
    *ids.iter()
        .min_by(|&&a, &&b| {
            let area_a = loader.get_metadata(a).map(CountryRecord::bbox_area).unwrap_or(f64::INFINITY);
            let area_b = loader.get_metadata(b).map(CountryRecord::bbox_area).unwrap_or(f64::INFINITY);
            area_a
                .partial_cmp(&area_b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        })
        .expect("ids must be non-empty")
}

fn best_effort_fallback(loader: &Loader, hash: &str, candidates: &[u32]) -> ForwardResult {
    if candidates.is_empty() {
        return ForwardResult::empty();
    }
    let best = smallest_bbox_tie_break(loader, candidates);
    let record = loader
        .get_metadata(best)
        .expect("candidate id must resolve to a loaded record");
    let confidence = apply_neighborhood_penalty(loader, hash, best, 0.15);
    ForwardResult::from_record(record, confidence)
}

/// Subtracts 0.05 per neighboring bucket whose majority country disagrees
/// with `winner`, floored at 0.10 once any resolution has succeeded
/// (spec.md §4.4 step 6). A neighbor bucket's "majority country" is its
/// sole candidate when it holds exactly one id, or its smallest-bbox
/// candidate otherwise — the same disambiguation rule used for overlapping
/// claims, applied locally to that bucket.
fn apply_neighborhood_penalty(loader: &Loader, hash: &str, winner: u32, base: f64) -> f64 {
    let neighbors = match geohash::neighbors(hash) {
        Ok(ns) => ns,
        Err(_) => return base,
    };

    let mut confidence = base;
    for n in neighbors {
        let bucket = loader.bucket(&n);
        if bucket.is_empty() {
            continue;
        }
        let majority = smallest_bbox_tie_break(loader, bucket);
        if majority != winner {
            confidence -= 0.05;
        }
    }

    confidence.max(0.10).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CountryRecord, Geometry, Polygon};
    use crate::pip::Ring;
    use std::collections::HashMap;

    fn square(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Geometry {
        Geometry::Single(Polygon {
            exterior: Ring::from_points(&[
                (min_lat, min_lon),
                (min_lat, max_lon),
                (max_lat, max_lon),
                (max_lat, min_lon),
            ]),
            holes: vec![],
        })
    }

    fn record(id: u32, name: &str, iso2: &str, geometry: Geometry) -> CountryRecord {
        let bbox = geometry.bbox();
        CountryRecord {
            id,
            name: name.to_string(),
            iso2: Some(iso2.to_string()),
            iso3: None,
            continent: "Testland".to_string(),
            timezone: "UTC".to_string(),
            centroid: bbox.map(|(a, b, c, d)| ((a + c) / 2.0, (b + d) / 2.0)),
            bbox,
            geometry: Some(geometry),
        }
    }

    /// Builds a `Loader` directly from in-memory records, bypassing disk
    /// I/O, by bucketing each record's geometry at precision 6 the way the
    /// build pipeline's bucketizer would.
    fn loader_from(records: Vec<CountryRecord>) -> Loader {
        let mut geohash_index: HashMap<String, Vec<u32>> = HashMap::new();
        for r in &records {
            if let Some(geom) = &r.geometry {
                for hash in crate::build::bucketize::bucket_geometry(geom, geohash::DEFAULT_PRECISION) {
                    geohash_index.entry(hash).or_default().push(r.id);
                }
            }
        }
        for ids in geohash_index.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        Loader::from_parts(records, geohash_index)
    }

    #[test]
    fn resolves_unique_candidate_with_full_confidence() {
        let us = record(0, "United States", "US", square(20.0, -130.0, 50.0, -60.0));
        let loader = loader_from(vec![us]);
        let result = resolve(&loader, 40.7128, -74.0060).unwrap();
        assert_eq!(result.iso2.as_deref(), Some("US"));
        assert!(result.confidence >= 0.85, "confidence was {}", result.confidence);
    }

    #[test]
    fn ocean_point_resolves_to_absence() {
        let us = record(0, "United States", "US", square(20.0, -130.0, 50.0, -60.0));
        let loader = loader_from(vec![us]);
        let result = resolve(&loader, 0.0, 0.0).unwrap();
        assert!(result.country.is_none());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn overlapping_territories_pick_smallest_bbox() {
        let big = record(0, "Big Country", "BC", square(0.0, 0.0, 10.0, 10.0));
        let small = record(1, "Enclave", "EN", square(4.0, 4.0, 6.0, 6.0));
        let loader = loader_from(vec![big, small]);
        let result = resolve(&loader, 5.0, 5.0).unwrap();
        assert_eq!(result.iso2.as_deref(), Some("EN"));
        assert!((result.confidence - 0.70).abs() < 1e-9);
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let loader = loader_from(vec![]);
        assert!(matches!(
            resolve(&loader, 95.0, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn confidence_is_always_in_unit_interval() {
        let us = record(0, "United States", "US", square(20.0, -130.0, 50.0, -60.0));
        let loader = loader_from(vec![us]);
        for (lat, lon) in [(40.0, -90.0), (0.0, 0.0), (89.0, 179.0)] {
            let result = resolve(&loader, lat, lon).unwrap();
            assert!((0.0..=1.0).contains(&result.confidence));
            assert!(result.confidence == 0.0 || result.country.is_some());
        }
    }
}
