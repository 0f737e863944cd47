//! Geohash bucketizer: assigns each country's geometry to every geohash
//! cell it touches at a fixed precision (spec.md §4.6 step 4).
//!
//! A cell is included if its center falls inside the geometry, or if any
//! polygon vertex falls inside the cell — the latter guarantees thin
//! slivers and coastlines aren't lost to the center-sampling grid walk.
//! Over-inclusion is acceptable; the resolver's own PIP pass is the final
//! authority (spec.md §4.4).

use crate::geohash;
use crate::model::Geometry;
use std::collections::BTreeSet;

/// All geohash cells (at `precision`) that `geometry` touches.
pub fn bucket_geometry(geometry: &Geometry, precision: usize) -> Vec<String> {
    let mut cells = BTreeSet::new();

    for_each_vertex(geometry, |lat, lon| {
        if let Ok(hash) = geohash::encode(lat, lon, precision) {
            cells.insert(hash);
        }
    });

    if let Some((min_lat, min_lon, max_lat, max_lon)) = geometry.bbox() {
        if let Some((lat_step, lon_step)) = cell_steps(min_lat, min_lon, precision) {
            let mut lat = min_lat;
            while lat <= max_lat + lat_step {
                let mut lon = min_lon;
                while lon <= max_lon + lon_step {
                    let clamped_lat = lat.clamp(-90.0, 90.0);
                    let clamped_lon = normalize_lon(lon);
                    if geometry.contains(clamped_lat, clamped_lon) {
                        if let Ok(hash) = geohash::encode(clamped_lat, clamped_lon, precision) {
                            cells.insert(hash);
                        }
                    }
                    lon += lon_step;
                }
                lat += lat_step;
            }
        }
    }

    cells.into_iter().collect()
}

fn for_each_vertex(geometry: &Geometry, mut f: impl FnMut(f64, f64)) {
    let mut visit_ring = |ring: &crate::pip::Ring| {
        for i in 0..ring.len() {
            let (lat, lon) = ring.point(i);
            f(lat, lon);
        }
    };
    match geometry {
        Geometry::Single(p) => {
            visit_ring(&p.exterior);
            for h in &p.holes {
                visit_ring(h);
            }
        }
        Geometry::Multi(parts) => {
            for p in parts {
                visit_ring(&p.exterior);
                for h in &p.holes {
                    visit_ring(h);
                }
            }
        }
    }
}

/// Half-degree-ish step sizes for a grid walk over a bbox: the full span of
/// one geohash cell at `precision`, sampled near the bbox's corner.
fn cell_steps(lat: f64, lon: f64, precision: usize) -> Option<(f64, f64)> {
    let hash = geohash::encode(lat.clamp(-90.0, 90.0), normalize_lon(lon), precision).ok()?;
    let cell = geohash::decode(&hash).ok()?;
    let lat_step = (cell.lat_half_span * 2.0).max(1e-6);
    let lon_step = (cell.lon_half_span * 2.0).max(1e-6);
    Some((lat_step, lon_step))
}

fn normalize_lon(mut lon: f64) -> f64 {
    while lon < -180.0 {
        lon += 360.0;
    }
    while lon > 180.0 {
        lon -= 360.0;
    }
    lon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Polygon;
    use crate::pip::Ring;

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

    #[test]
    fn bucketizes_a_small_square_into_at_least_one_cell() {
        let geom = square(10.0, 10.0, 10.1, 10.1);
        let cells = bucket_geometry(&geom, 6);
        assert!(!cells.is_empty());
    }

    #[test]
    fn a_point_inside_the_square_maps_to_a_bucketized_cell() {
        let geom = square(0.0, 0.0, 5.0, 5.0);
        let cells = bucket_geometry(&geom, 4);
        let inside_hash = geohash::encode(2.5, 2.5, 4).unwrap();
        assert!(cells.contains(&inside_hash));
    }

    #[test]
    fn larger_geometry_bucketizes_to_more_cells_than_a_pinpoint() {
        let small = square(0.0, 0.0, 0.01, 0.01);
        let large = square(0.0, 0.0, 20.0, 20.0);
        assert!(bucket_geometry(&large, 5).len() > bucket_geometry(&small, 5).len());
    }
}
