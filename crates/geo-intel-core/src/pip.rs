//! Planar point-in-polygon test over [`Ring`]s.
//!
//! Rings are stored structure-of-arrays (parallel `lats`/`lons` vectors)
//! rather than `Vec<(f64, f64)>`: `spec.md`'s design notes call this out
//! explicitly as roughly halving cache misses during PIP, and it's the same
//! layout discipline the teacher repo applies to its own flat model
//! (`Range`-addressed parallel vectors instead of nested owned structs).
//!
//! No early bbox rejection happens in here — callers filter candidates via
//! the geohash bucket first; PIP is the authority once a candidate is
//! selected.

use serde::{Deserialize, Serialize};

/// A closed ring: the first vertex is not repeated at the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ring {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl Ring {
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut lats = Vec::with_capacity(points.len());
        let mut lons = Vec::with_capacity(points.len());
        for &(lat, lon) in points {
            lats.push(lat);
            lons.push(lon);
        }
        Ring { lats, lons }
    }

    pub fn len(&self) -> usize {
        self.lats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lats.is_empty()
    }

    /// A ring needs at least 3 distinct vertices to be a valid exterior
    /// (spec.md §3 invariant).
    pub fn is_valid(&self) -> bool {
        self.len() >= 3
    }

    pub fn point(&self, i: usize) -> (f64, f64) {
        (self.lats[i], self.lons[i])
    }
}

/// Even-odd ray-cast point-in-polygon over a single closed ring.
///
/// The ring is treated as closed regardless of whether the first vertex is
/// physically repeated. A point exactly on an edge is considered inside.
pub fn point_in_polygon(lat: f64, lon: f64, ring: &Ring) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    if point_on_boundary(lat, lon, ring) {
        return true;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (yi, xi) = ring.point(i);
        let (yj, xj) = ring.point(j);

        // Half-open edge rule: (y_i > y) != (y_j > y), avoids double-counting
        // vertex hits.
        if (yi > lat) != (yj > lat) {
            let x_intersect = xi + (lat - yi) / (yj - yi) * (xj - xi);
            if lon < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn point_on_boundary(lat: f64, lon: f64, ring: &Ring) -> bool {
    let n = ring.len();
    let mut j = n - 1;
    for i in 0..n {
        let (yi, xi) = ring.point(i);
        let (yj, xj) = ring.point(j);
        if on_segment(lat, lon, yi, xi, yj, xj) {
            return true;
        }
        j = i;
    }
    false
}

fn on_segment(py: f64, px: f64, ay: f64, ax: f64, by: f64, bx: f64) -> bool {
    let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
    if cross.abs() > 1e-9 {
        return false;
    }
    let within_y = py >= ay.min(by) - 1e-12 && py <= ay.max(by) + 1e-12;
    let within_x = px >= ax.min(bx) - 1e-12 && px <= ax.max(bx) + 1e-12;
    within_y && within_x
}

/// True iff the point is inside `exterior` and outside every ring in `holes`.
pub fn point_in_polygon_with_holes(lat: f64, lon: f64, exterior: &Ring, holes: &[Ring]) -> bool {
    if !point_in_polygon(lat, lon, exterior) {
        return false;
    }
    !holes.iter().any(|hole| point_in_polygon(lat, lon, hole))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        // (lat, lon) unit square, CCW
        Ring::from_points(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)])
    }

    #[test]
    fn inside_and_outside_basic_square() {
        let ring = square();
        assert!(point_in_polygon(5.0, 5.0, &ring));
        assert!(!point_in_polygon(20.0, 20.0, &ring));
        assert!(!point_in_polygon(-1.0, 5.0, &ring));
    }

    #[test]
    fn edge_and_vertex_points_are_inside() {
        let ring = square();
        assert!(point_in_polygon(0.0, 5.0, &ring), "on bottom edge");
        assert!(point_in_polygon(0.0, 0.0, &ring), "on vertex");
        assert!(point_in_polygon(10.0, 10.0, &ring), "on opposite vertex");
    }

    #[test]
    fn hole_excludes_interior_point() {
        let exterior = square();
        let hole = Ring::from_points(&[(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0)]);
        assert!(point_in_polygon_with_holes(1.0, 1.0, &exterior, &[hole.clone()]));
        assert!(!point_in_polygon_with_holes(5.0, 5.0, &exterior, &[hole]));
    }

    #[test]
    fn degenerate_ring_is_never_inside() {
        let degenerate = Ring::from_points(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(!point_in_polygon(0.5, 0.5, &degenerate));
    }
}
