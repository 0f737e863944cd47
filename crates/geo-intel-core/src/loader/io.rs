//! Physical I/O: opening an artifact file and transparently decompressing
//! it. One small helper reused by both the query-time loader and the
//! build-time writer, the way the teacher centralizes its own gzip logic in
//! `loader/common_io.rs::open_stream` rather than duplicating it per caller.

use crate::error::{GeoError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Opens `path`, buffering it and — when the filename ends in `.gz` —
/// transparently gunzipping it. Returns a generic reader so callers never
/// need to branch on compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|_| GeoError::ArtifactMissing {
        name: artifact_name(path),
    })?;
    let reader = BufReader::new(file);

    if is_gzip_path(path) {
        #[cfg(feature = "compact")]
        {
            Ok(Box::new(flate2::read::GzDecoder::new(reader)))
        }
        #[cfg(not(feature = "compact"))]
        {
            Err(GeoError::ArtifactCorrupt {
                name: artifact_name(path),
                detail: "gzip artifact but 'compact' feature is disabled".into(),
            })
        }
    } else {
        Ok(Box::new(reader))
    }
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Leaks a `'static` copy of the artifact's base name (without `.gz`) for use
/// in error messages; artifact names are one of a small fixed set
/// ("metadata", "polygons", "geohash_index"), so the error path is cold.
fn artifact_name(path: &Path) -> &'static str {
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("artifact");
    let base = stem.strip_suffix(".gz").unwrap_or(stem);
    let base = base.strip_suffix(".json").unwrap_or(base);
    match base {
        "metadata" => "metadata",
        "polygons" => "polygons",
        "geohash_index" => "geohash_index",
        _ => "artifact",
    }
}

/// Resolves `<dir>/<name>.json[.gz]`, preferring the compressed form if both
/// exist (spec.md §4.3 loader contract).
pub fn resolve_artifact_path(dir: &Path, name: &'static str) -> Result<PathBuf> {
    let gz_path = dir.join(format!("{name}.json.gz"));
    let plain_path = dir.join(format!("{name}.json"));

    if gz_path.exists() {
        Ok(gz_path)
    } else if plain_path.exists() {
        Ok(plain_path)
    } else {
        Err(GeoError::ArtifactMissing { name })
    }
}
