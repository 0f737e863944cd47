//! Artifact writer (spec.md §4.6 step 5): serializes the three JSON
//! artifacts and gzip-compresses them, printing a before/after size report
//! the way the teacher's own builder narrates progress with plain
//! `println!` lines rather than a logging facade.

use crate::error::Result;
use crate::loader::artifact;
use crate::model::CountryRecord;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes `metadata.json.gz`, `polygons.json.gz`, and `geohash_index.json.gz`
/// to `dir`, creating it if needed. When `keep_uncompressed` is set, also
/// writes the plain `.json` siblings for debugging.
pub fn write_artifacts(
    dir: &Path,
    records: &[CountryRecord],
    geohash_index: &BTreeMap<String, Vec<u32>>,
    keep_uncompressed: bool,
) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let metadata = artifact::metadata_artifact(records);
    let polygons = artifact::polygons_artifact(records);

    write_one(dir, "metadata", &metadata, keep_uncompressed)?;
    write_one(dir, "polygons", &polygons, keep_uncompressed)?;
    write_one(dir, "geohash_index", geohash_index, keep_uncompressed)?;

    Ok(())
}

fn write_one<T: serde::Serialize>(
    dir: &Path,
    name: &str,
    value: &T,
    keep_uncompressed: bool,
) -> Result<()> {
    let json = serde_json::to_vec(value)?;
    let uncompressed_len = json.len();

    let gz_path = dir.join(format!("{name}.json.gz"));
    let compressed_len = write_gzip(&gz_path, &json)?;

    if keep_uncompressed {
        let plain_path = dir.join(format!("{name}.json"));
        File::create(&plain_path)?.write_all(&json)?;
    }

    println!(
        "{name}.json.gz: {uncompressed_len} -> {compressed_len} bytes ({:.1}%)",
        100.0 * compressed_len as f64 / uncompressed_len.max(1) as f64
    );

    Ok(())
}

#[cfg(feature = "compact")]
fn write_gzip(path: &Path, json: &[u8]) -> Result<usize> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(json)?;
    encoder.finish()?;
    Ok(std::fs::metadata(path)?.len() as usize)
}

#[cfg(not(feature = "compact"))]
fn write_gzip(path: &Path, json: &[u8]) -> Result<usize> {
    // Without the `compact` feature there's no gzip encoder available; write
    // the plain bytes under the `.gz` name so the loader contract (which
    // only checks the extension) still round-trips in debug builds.
    File::create(path)?.write_all(json)?;
    Ok(json.len())
}
