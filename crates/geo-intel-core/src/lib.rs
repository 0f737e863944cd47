//! Offline geospatial country resolution: forward (coordinate -> country)
//! and reverse (country identifier -> metadata) lookups over a self-
//! contained artifact set, no network access and no live dataset (spec.md
//! §1). The public surface is small by design: [`resolve`] and
//! [`resolve_by_country`], each optionally taking an explicit [`Loader`] and
//! otherwise falling back to the process-wide default.

#[cfg(feature = "builder")]
pub mod build;
pub mod error;
pub mod geohash;
pub mod loader;
pub mod model;
pub mod pip;
pub mod resolver;
pub mod reverse;
pub mod text;

pub use error::{GeoError, Result};
pub use loader::{default_loader, Loader, LoaderFilter};
pub use model::{CountryRecord, ForwardResult, Geometry, Polygon, ReverseResult};

/// Resolves `(lat, lon)` to a country, using `loader` if given or the
/// process-wide default otherwise (spec.md §4.4, §6).
pub fn resolve(lat: f64, lon: f64, loader: Option<&Loader>) -> Result<ForwardResult> {
    match loader {
        Some(loader) => resolver::resolve(loader, lat, lon),
        None => resolver::resolve(default_loader()?, lat, lon),
    }
}

/// Resolves a country identifier (ISO2, ISO3, or name) to its metadata,
/// using `loader` if given or the process-wide default otherwise (spec.md
/// §4.5, §6).
pub fn resolve_by_country(query: &str, loader: Option<&Loader>) -> Result<ReverseResult> {
    match loader {
        Some(loader) => reverse::resolve_by_country(loader, query),
        None => reverse::resolve_by_country(default_loader()?, query),
    }
}
