//! Error taxonomy for the engine.
//!
//! Four kinds are surfaced to callers (`InvalidCoordinate`, `EmptyQuery`,
//! `ArtifactMissing`, `ArtifactCorrupt`); `Io`/`Json` are internal plumbing
//! that the loader wraps into `ArtifactCorrupt`/`ArtifactMissing` before they
//! cross the public boundary. `NotFound` is deliberately not a variant here —
//! absence is data, not an error (see `ForwardResult`/`ReverseResult`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("empty query")]
    EmptyQuery,

    #[error("artifact missing: {name}")]
    ArtifactMissing { name: &'static str },

    #[error("artifact corrupt: {name}: {detail}")]
    ArtifactCorrupt { name: &'static str, detail: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeoError>;
