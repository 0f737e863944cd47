use clap::{Parser, Subcommand};

/// CLI arguments for geo-intel
#[derive(Debug, Parser)]
#[command(
    name = "geo-intel",
    version,
    about = "Offline coordinate <-> country resolution"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the artifact set (metadata/polygons/geohash_index) from a GeoJSON source.
    #[cfg(feature = "builder")]
    Build {
        /// Path to a GeoJSON FeatureCollection (Polygon/MultiPolygon features).
        input: String,

        /// Directory the artifact files are written into.
        output_dir: String,

        /// Douglas-Peucker simplification tolerance, in degrees.
        #[arg(long, default_value_t = 0.005)]
        tolerance: f64,

        /// Geohash bucket precision.
        #[arg(long, default_value_t = 6)]
        precision: usize,

        /// Also write uncompressed `.json` siblings, for debugging.
        #[arg(long)]
        keep_uncompressed: bool,
    },

    /// Resolve a coordinate to a country.
    Resolve {
        /// Latitude, in degrees.
        lat: f64,
        /// Longitude, in degrees.
        lon: f64,

        /// Artifact directory (default: `$GEO_INTEL_DATA_DIR` or the bundled data dir).
        #[arg(short = 'd', long = "data-dir", global = true)]
        data_dir: Option<String>,
    },

    /// Resolve a country identifier (ISO2, ISO3, or name) to its metadata.
    Reverse {
        /// ISO2, ISO3, or a (possibly partial) country name.
        query: String,

        /// Artifact directory (default: `$GEO_INTEL_DATA_DIR` or the bundled data dir).
        #[arg(short = 'd', long = "data-dir", global = true)]
        data_dir: Option<String>,
    },
}
