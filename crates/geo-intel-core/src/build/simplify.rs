//! Douglas-Peucker polygon simplification (spec.md §4.6 step 3).
//!
//! Runs independently per ring (exterior and each hole); a ring that
//! collapses below 3 vertices after simplification is dropped rather than
//! kept degenerate, matching [`crate::pip::Ring::is_valid`].

use crate::model::{Geometry, Polygon};
use crate::pip::Ring;

/// Default tolerance in degrees, used by the CLI's `build` subcommand when
/// none is given (spec.md §6).
pub const DEFAULT_TOLERANCE: f64 = 0.005;

pub fn simplify_geometry(geometry: &Geometry, tolerance: f64) -> Geometry {
    match geometry {
        Geometry::Single(p) => Geometry::Single(simplify_polygon(p, tolerance)),
        Geometry::Multi(parts) => {
            Geometry::Multi(parts.iter().map(|p| simplify_polygon(p, tolerance)).collect())
        }
    }
}

fn simplify_polygon(polygon: &Polygon, tolerance: f64) -> Polygon {
    Polygon {
        exterior: simplify_ring(&polygon.exterior, tolerance),
        holes: polygon
            .holes
            .iter()
            .map(|h| simplify_ring(h, tolerance))
            .filter(|r| r.is_valid())
            .collect(),
    }
}

fn simplify_ring(ring: &Ring, tolerance: f64) -> Ring {
    if ring.len() < 4 {
        return ring.clone();
    }
    let points: Vec<(f64, f64)> = (0..ring.len()).map(|i| ring.point(i)).collect();
    let mut simplified = douglas_peucker(&points, tolerance);
    // A closed ring needs its own first/last distinct; Douglas-Peucker
    // always keeps both endpoints, so drop the duplicate if the input was
    // ingested with a repeated closing vertex.
    if simplified.len() > 1 && simplified.first() == simplified.last() {
        simplified.pop();
    }
    Ring::from_points(&simplified)
}

/// Classic recursive Douglas-Peucker over an open polyline. Always retains
/// the first and last point.
fn douglas_peucker(points: &[(f64, f64)], tolerance: f64) -> Vec<(f64, f64)> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let (first, last) = (points[0], points[points.len() - 1]);
    let mut max_dist = 0.0;
    let mut split_at = 0;

    for (i, &p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(p, first, last);
        if dist > max_dist {
            max_dist = dist;
            split_at = i;
        }
    }

    if max_dist > tolerance {
        let mut left = douglas_peucker(&points[..=split_at], tolerance);
        let right = douglas_peucker(&points[split_at..], tolerance);
        left.pop(); // avoid duplicating the shared split point
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn perpendicular_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (py, px) = p;
    let (ay, ax) = a;
    let (by, bx) = b;

    let dy = by - ay;
    let dx = bx - ax;
    let len_sq = dy * dy + dx * dx;

    if len_sq < 1e-18 {
        return ((py - ay).powi(2) + (px - ax).powi(2)).sqrt();
    }

    let numerator = (dy * (px - ax) - dx * (py - ay)).abs();
    numerator / len_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_points_are_removed() {
        let ring = Ring::from_points(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (0.0, 2.0), // collinear, should be dropped
            (2.0, 2.0),
            (2.0, 0.0),
        ]);
        let simplified = simplify_ring(&ring, 0.01);
        assert!(simplified.len() < ring.len());
        assert!(simplified.is_valid());
    }

    #[test]
    fn ring_smaller_than_four_points_is_untouched() {
        let ring = Ring::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let simplified = simplify_ring(&ring, 0.5);
        assert_eq!(simplified, ring);
    }

    #[test]
    fn large_tolerance_can_collapse_a_ring_below_validity() {
        let ring = Ring::from_points(&[(0.0, 0.0), (0.0, 0.001), (0.001, 0.001), (0.001, 0.0)]);
        let simplified = simplify_ring(&ring, 10.0);
        assert!(!simplified.is_valid());
    }
}
