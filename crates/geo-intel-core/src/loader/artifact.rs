//! On-disk artifact schema (spec.md §4.3). This is the portability contract:
//! a self-describing JSON shape, independent of whatever in-memory layout
//! the loader builds from it. Three top-level maps, one per file:
//! `metadata.json[.gz]`, `polygons.json[.gz]`, `geohash_index.json[.gz]`.

use crate::model::{CountryRecord, Geometry, Polygon};
use crate::pip::Ring;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    #[serde(default)]
    pub iso2: Option<String>,
    #[serde(default)]
    pub iso3: Option<String>,
    #[serde(default)]
    pub continent: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub centroid: Option<(f64, f64)>,
    #[serde(default)]
    pub bbox: Option<(f64, f64, f64, f64)>,
}

pub type MetadataArtifact = BTreeMap<String, MetadataEntry>;

type RingPoints = Vec<(f64, f64)>;

/// One country's polygon(s), on the wire. Untagged so `{"exterior": ...}`
/// and `{"multi": true, "exteriors": ...}` both round-trip without an
/// explicit discriminant field cluttering the single-polygon case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolygonEntry {
    Single {
        exterior: RingPoints,
        #[serde(default)]
        holes: Vec<RingPoints>,
    },
    Multi {
        multi: MultiMarker,
        exteriors: Vec<RingPoints>,
        #[serde(default)]
        holes: Vec<Vec<RingPoints>>,
    },
}

/// A unit struct that only (de)serializes through the literal JSON boolean
/// `true`, so `PolygonEntry`'s untagged variants stay unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiMarker;

impl Serialize for MultiMarker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for MultiMarker {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let b = bool::deserialize(deserializer)?;
        if b {
            Ok(MultiMarker)
        } else {
            Err(serde::de::Error::custom("expected `multi: true`"))
        }
    }
}

pub type PolygonsArtifact = BTreeMap<String, PolygonEntry>;

pub type GeohashIndexArtifact = BTreeMap<String, Vec<u32>>;

fn ring_from_points(points: &RingPoints) -> Ring {
    Ring::from_points(points)
}

fn ring_to_points(ring: &Ring) -> RingPoints {
    (0..ring.len()).map(|i| ring.point(i)).collect()
}

pub fn geometry_from_entry(entry: PolygonEntry) -> Geometry {
    match entry {
        PolygonEntry::Single { exterior, holes } => Geometry::Single(Polygon {
            exterior: ring_from_points(&exterior),
            holes: holes.iter().map(ring_from_points).collect(),
        }),
        PolygonEntry::Multi {
            multi: _,
            exteriors,
            holes,
        } => {
            let parts = exteriors
                .into_iter()
                .enumerate()
                .map(|(i, ext)| {
                    let part_holes = holes
                        .get(i)
                        .map(|hs| hs.iter().map(ring_from_points).collect())
                        .unwrap_or_default();
                    Polygon {
                        exterior: ring_from_points(&ext),
                        holes: part_holes,
                    }
                })
                .collect();
            Geometry::Multi(parts)
        }
    }
}

pub fn entry_from_geometry(geometry: &Geometry) -> PolygonEntry {
    match geometry {
        Geometry::Single(p) => PolygonEntry::Single {
            exterior: ring_to_points(&p.exterior),
            holes: p.holes.iter().map(ring_to_points).collect(),
        },
        Geometry::Multi(parts) => PolygonEntry::Multi {
            multi: MultiMarker,
            exteriors: parts.iter().map(|p| ring_to_points(&p.exterior)).collect(),
            holes: parts
                .iter()
                .map(|p| p.holes.iter().map(ring_to_points).collect())
                .collect(),
        },
    }
}

/// Assembles the in-memory [`CountryRecord`]s from the parsed metadata and
/// polygons artifacts. A record with metadata but no (or invalid) polygon
/// entry keeps `geometry: None` — still usable for reverse lookup, excluded
/// from the geohash index (spec.md §3).
pub fn assemble_records(
    metadata: MetadataArtifact,
    mut polygons: PolygonsArtifact,
) -> crate::error::Result<Vec<CountryRecord>> {
    let mut records = Vec::with_capacity(metadata.len());
    for (id_str, meta) in metadata {
        let id: u32 = id_str.parse().map_err(|_| crate::error::GeoError::ArtifactCorrupt {
            name: "metadata",
            detail: format!("non-integer id key: {id_str}"),
        })?;
        let geometry = polygons.remove(&id_str).map(geometry_from_entry);
        records.push(CountryRecord {
            id,
            name: meta.name,
            iso2: meta.iso2,
            iso3: meta.iso3,
            continent: meta.continent,
            timezone: meta.timezone,
            centroid: meta.centroid,
            bbox: meta.bbox,
            geometry,
        });
    }
    records.sort_by_key(|r| r.id);
    Ok(records)
}

pub fn metadata_artifact(records: &[CountryRecord]) -> MetadataArtifact {
    records
        .iter()
        .map(|r| {
            (
                r.id.to_string(),
                MetadataEntry {
                    name: r.name.clone(),
                    iso2: r.iso2.clone(),
                    iso3: r.iso3.clone(),
                    continent: r.continent.clone(),
                    timezone: r.timezone.clone(),
                    centroid: r.centroid,
                    bbox: r.bbox,
                },
            )
        })
        .collect()
}

pub fn polygons_artifact(records: &[CountryRecord]) -> PolygonsArtifact {
    records
        .iter()
        .filter(|r| r.is_indexable())
        .filter_map(|r| {
            r.geometry
                .as_ref()
                .map(|g| (r.id.to_string(), entry_from_geometry(g)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_polygon_round_trips_through_json() {
        let poly = Polygon {
            exterior: Ring::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]),
            holes: vec![],
        };
        let geometry = Geometry::Single(poly);
        let entry = entry_from_geometry(&geometry);
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: PolygonEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(geometry_from_entry(parsed), geometry);
    }

    #[test]
    fn multi_polygon_round_trips_through_json() {
        let geometry = Geometry::Multi(vec![
            Polygon {
                exterior: Ring::from_points(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]),
                holes: vec![],
            },
            Polygon {
                exterior: Ring::from_points(&[(5.0, 5.0), (5.0, 6.0), (6.0, 6.0)]),
                holes: vec![Ring::from_points(&[(5.2, 5.2), (5.2, 5.4), (5.4, 5.4)])],
            },
        ]);
        let entry = entry_from_geometry(&geometry);
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: PolygonEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(geometry_from_entry(parsed), geometry);
    }
}
