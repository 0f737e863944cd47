//! The in-memory data model: [`CountryRecord`], its [`Geometry`], and the
//! value objects returned by the two resolvers. Frozen at artifact-write
//! time, loaded read-only — the engine never mutates a record after
//! construction (spec.md §3 lifecycle).

use crate::pip::Ring;
use serde::{Deserialize, Serialize};

/// A single polygon part: one exterior ring plus zero or more holes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        crate::pip::point_in_polygon_with_holes(lat, lon, &self.exterior, &self.holes)
    }

    /// Bounding box of the exterior ring: `(min_lat, min_lon, max_lat, max_lon)`.
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        ring_bbox(&self.exterior)
    }

    pub fn is_valid(&self) -> bool {
        self.exterior.is_valid()
    }
}

fn ring_bbox(ring: &Ring) -> Option<(f64, f64, f64, f64)> {
    if ring.is_empty() {
        return None;
    }
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    for i in 0..ring.len() {
        let (lat, lon) = ring.point(i);
        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
        min_lon = min_lon.min(lon);
        max_lon = max_lon.max(lon);
    }
    Some((min_lat, min_lon, max_lat, max_lon))
}

/// A territory's geometry: one polygon, or several disjoint ones (island
/// nations, overseas territories).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Geometry {
    Single(Polygon),
    Multi(Vec<Polygon>),
}

impl Geometry {
    /// True iff `(lat, lon)` is inside any part, considering that part's own
    /// holes.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        match self {
            Geometry::Single(p) => p.contains(lat, lon),
            Geometry::Multi(parts) => parts.iter().any(|p| p.contains(lat, lon)),
        }
    }

    /// Bounding box across all parts: `(min_lat, min_lon, max_lat, max_lon)`.
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        let boxes: Vec<_> = match self {
            Geometry::Single(p) => p.bbox().into_iter().collect(),
            Geometry::Multi(parts) => parts.iter().filter_map(|p| p.bbox()).collect(),
        };
        union_bbox(&boxes)
    }

    pub fn bbox_area(&self) -> f64 {
        match self.bbox() {
            Some((min_lat, min_lon, max_lat, max_lon)) => {
                (max_lat - min_lat).max(0.0) * (max_lon - min_lon).max(0.0)
            }
            None => f64::INFINITY,
        }
    }

    /// The largest part by bbox area — used for centroid computation
    /// (spec.md §3: centroid is the mean of the largest part's exterior).
    pub fn largest_part(&self) -> Option<&Polygon> {
        match self {
            Geometry::Single(p) => Some(p),
            Geometry::Multi(parts) => parts.iter().max_by(|a, b| {
                a.bbox()
                    .map(|(mnla, mnlo, mxla, mxlo)| (mxla - mnla) * (mxlo - mnlo))
                    .partial_cmp(
                        &b.bbox()
                            .map(|(mnla, mnlo, mxla, mxlo)| (mxla - mnla) * (mxlo - mnlo)),
                    )
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
        }
    }

    /// Mean of the largest part's exterior vertices (spec.md §3).
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let ring = &self.largest_part()?.exterior;
        if ring.is_empty() {
            return None;
        }
        let n = ring.len() as f64;
        let (sum_lat, sum_lon) = (0..ring.len()).fold((0.0, 0.0), |(sa, so), i| {
            let (lat, lon) = ring.point(i);
            (sa + lat, so + lon)
        });
        Some((sum_lat / n, sum_lon / n))
    }

    /// True iff every exterior ring in this geometry is valid (spec.md §3:
    /// a record with no valid exterior is excluded from the geohash index).
    pub fn has_any_valid_part(&self) -> bool {
        match self {
            Geometry::Single(p) => p.is_valid(),
            Geometry::Multi(parts) => parts.iter().any(|p| p.is_valid()),
        }
    }
}

fn union_bbox(boxes: &[(f64, f64, f64, f64)]) -> Option<(f64, f64, f64, f64)> {
    boxes.iter().copied().reduce(|a, b| {
        (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
    })
}

/// The authoritative per-territory entry (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRecord {
    pub id: u32,
    pub name: String,
    pub iso2: Option<String>,
    pub iso3: Option<String>,
    pub continent: String,
    pub timezone: String,
    pub centroid: Option<(f64, f64)>,
    pub bbox: Option<(f64, f64, f64, f64)>,
    pub geometry: Option<Geometry>,
}

impl CountryRecord {
    /// A record is indexable iff it retained at least one valid exterior
    /// ring after simplification (spec.md §3, §4.6 step 3).
    pub fn is_indexable(&self) -> bool {
        self.geometry
            .as_ref()
            .is_some_and(Geometry::has_any_valid_part)
    }

    pub fn bbox_area(&self) -> f64 {
        match self.bbox {
            Some((min_lat, min_lon, max_lat, max_lon)) => {
                (max_lat - min_lat).max(0.0) * (max_lon - min_lon).max(0.0)
            }
            None => f64::INFINITY,
        }
    }
}

/// Result of a forward (coordinate -> country) resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ForwardResult {
    pub country: Option<String>,
    pub iso2: Option<String>,
    pub iso3: Option<String>,
    pub continent: Option<String>,
    pub timezone: Option<String>,
    pub confidence: f64,
}

impl ForwardResult {
    pub fn empty() -> Self {
        ForwardResult {
            confidence: 0.0,
            ..Default::default()
        }
    }

    pub fn from_record(record: &CountryRecord, confidence: f64) -> Self {
        ForwardResult {
            country: Some(record.name.clone()),
            iso2: record.iso2.clone(),
            iso3: record.iso3.clone(),
            continent: non_empty(&record.continent),
            timezone: non_empty(&record.timezone),
            confidence,
        }
    }
}

/// Result of a reverse (country identifier -> coordinate) resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReverseResult {
    pub country: Option<String>,
    pub iso2: Option<String>,
    pub iso3: Option<String>,
    pub continent: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ReverseResult {
    pub fn not_found() -> Self {
        ReverseResult::default()
    }

    pub fn from_record(record: &CountryRecord) -> Self {
        ReverseResult {
            country: Some(record.name.clone()),
            iso2: record.iso2.clone(),
            iso3: record.iso3.clone(),
            continent: non_empty(&record.continent),
            timezone: non_empty(&record.timezone),
            latitude: record.centroid.map(|(lat, _)| lat),
            longitude: record.centroid.map(|(_, lon)| lon),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_polygon(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Polygon {
        Polygon {
            exterior: Ring::from_points(&[
                (min_lat, min_lon),
                (min_lat, max_lon),
                (max_lat, max_lon),
                (max_lat, min_lon),
            ]),
            holes: vec![],
        }
    }

    #[test]
    fn multi_polygon_contains_if_any_part_contains() {
        let geom = Geometry::Multi(vec![
            square_polygon(0.0, 0.0, 1.0, 1.0),
            square_polygon(10.0, 10.0, 11.0, 11.0),
        ]);
        assert!(geom.contains(0.5, 0.5));
        assert!(geom.contains(10.5, 10.5));
        assert!(!geom.contains(5.0, 5.0));
    }

    #[test]
    fn largest_part_is_the_biggest_bbox() {
        let small = square_polygon(0.0, 0.0, 1.0, 1.0);
        let big = square_polygon(0.0, 0.0, 10.0, 10.0);
        let geom = Geometry::Multi(vec![small.clone(), big.clone()]);
        assert_eq!(geom.largest_part(), Some(&big));
    }
}
