//! GeoJSON ingestion (spec.md §4.6 step 1): reads a Natural-Earth-style
//! `FeatureCollection`, keeping only `Polygon`/`MultiPolygon` geometries and
//! the handful of properties the engine cares about. Anything else is
//! skipped with a warning to stderr, not a hard failure — a single odd
//! feature shouldn't abort an otherwise-good build.
//!
//! GeoJSON coordinates are `[lon, lat]`; every ring here is converted to the
//! engine's internal `(lat, lon)` convention immediately on ingest so the
//! rest of the pipeline never has to think about axis order again.

use crate::error::{GeoError, Result};
use crate::model::{CountryRecord, Geometry, Polygon};
use crate::pip::Ring;
use serde_json::Value;

/// One ingested feature, pre-simplification, pre-bucketization.
pub struct IngestedCountry {
    pub name: String,
    pub iso2: Option<String>,
    pub iso3: Option<String>,
    pub continent: String,
    pub timezone: String,
    pub geometry: Geometry,
}

/// Parses a GeoJSON `FeatureCollection` into ingested countries, in feature
/// order (the build pipeline assigns ids by this order).
pub fn ingest_geojson(source: &str) -> Result<Vec<IngestedCountry>> {
    let doc: Value = serde_json::from_str(source)?;

    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| GeoError::ArtifactCorrupt {
            name: "geojson",
            detail: "missing top-level \"features\" array".into(),
        })?;

    let mut countries = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        match ingest_feature(feature) {
            Some(country) => countries.push(country),
            None => eprintln!("skipping feature {i}: unsupported geometry or missing name"),
        }
    }
    Ok(countries)
}

fn ingest_feature(feature: &Value) -> Option<IngestedCountry> {
    let properties = feature.get("properties")?;
    let geometry_json = feature.get("geometry")?;
    let geometry = geometry_from_geojson(geometry_json)?;

    let name = first_string(properties, &["NAME", "NAME_LONG", "name", "ADMIN"])?;
    let iso2 = first_string(properties, &["ISO_A2", "iso_a2", "iso2"]).filter(|s| s.len() == 2);
    let iso3 = first_string(properties, &["ISO_A3", "iso_a3", "iso3"]).filter(|s| s.len() == 3);
    let continent = first_string(properties, &["CONTINENT", "continent"]).unwrap_or_default();
    let timezone = first_string(properties, &["TIMEZONE", "timezone", "tz"]).unwrap_or_default();

    Some(IngestedCountry {
        name,
        iso2,
        iso3,
        continent,
        timezone,
        geometry,
    })
}

fn first_string(properties: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| properties.get(*k))
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

fn geometry_from_geojson(geometry: &Value) -> Option<Geometry> {
    let kind = geometry.get("type")?.as_str()?;
    let coords = geometry.get("coordinates")?;

    match kind {
        "Polygon" => Some(Geometry::Single(polygon_from_rings(coords.as_array()?)?)),
        "MultiPolygon" => {
            let parts = coords
                .as_array()?
                .iter()
                .filter_map(|rings| rings.as_array().and_then(|r| polygon_from_rings(r)))
                .collect::<Vec<_>>();
            if parts.is_empty() {
                None
            } else {
                Some(Geometry::Multi(parts))
            }
        }
        _ => None,
    }
}

fn polygon_from_rings(rings: &[Value]) -> Option<Polygon> {
    let mut rings = rings.iter();
    let exterior = ring_from_coords(rings.next()?.as_array()?)?;
    let holes = rings
        .filter_map(|r| r.as_array().and_then(|pts| ring_from_coords(pts)))
        .collect();
    Some(Polygon { exterior, holes })
}

fn ring_from_coords(coords: &[Value]) -> Option<Ring> {
    let mut points = Vec::with_capacity(coords.len());
    for pair in coords {
        let pair = pair.as_array()?;
        let lon = pair.first()?.as_f64()?;
        let lat = pair.get(1)?.as_f64()?;
        points.push((lat, lon));
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Some(Ring::from_points(&points))
}

/// Sorts by `(name, iso3)` and assigns dense ids `0..N-1` in that order
/// (spec.md §4.6 step 2) — a build is deterministic by construction
/// regardless of the GeoJSON source's feature order, since Natural
/// Earth-derived files make no ordering guarantee. Also fills
/// `centroid`/`bbox` from the (pre-simplification) geometry; these get
/// recomputed after simplification in the writer stage, since
/// simplification can shift a bbox slightly.
pub fn into_records(mut countries: Vec<IngestedCountry>) -> Vec<CountryRecord> {
    countries.sort_by(|a, b| (&a.name, &a.iso3).cmp(&(&b.name, &b.iso3)));
    countries
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let bbox = c.geometry.bbox();
            let centroid = c.geometry.centroid();
            CountryRecord {
                id: i as u32,
                name: c.name,
                iso2: c.iso2,
                iso3: c.iso3,
                continent: c.continent,
                timezone: c.timezone,
                centroid,
                bbox,
                geometry: Some(c.geometry),
            }
        })
        .collect()
}
