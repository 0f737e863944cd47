//! geo-intel-cli — Command-line interface for geo-intel-core
//!
//! This binary is a thin wrapper: it parses arguments, loads a `Loader`
//! (or drives the build pipeline), and prints whatever the core engine
//! returns. No resolution logic lives here.
//!
//! Usage examples
//! --------------
//! - Build artifacts: `geo-intel build countries.geojson ./data`
//! - Resolve a point: `geo-intel resolve 40.7128 -74.0060`
//! - Reverse lookup: `geo-intel reverse US`

mod args;

use crate::args::{CliArgs, Commands};
use clap::Parser;
use geo_intel_core::{Loader, LoaderFilter};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    match args.command {
        #[cfg(feature = "builder")]
        Commands::Build {
            input,
            output_dir,
            tolerance,
            precision,
            keep_uncompressed,
        } => {
            println!("=== geo-intel builder ===");
            println!("Source: {input}");
            let source = std::fs::read_to_string(&input)?;
            let report = geo_intel_core::build::build(
                &source,
                std::path::Path::new(&output_dir),
                tolerance,
                precision,
                keep_uncompressed,
            )?;
            println!(
                "✓ {} countries, {} buckets, in {:.2?}",
                report.countries, report.buckets, report.elapsed
            );
        }

        Commands::Resolve { lat, lon, data_dir } => {
            let loader = open_loader(data_dir)?;
            let result = geo_intel_core::resolve(lat, lon, Some(&loader))?;
            match &result.country {
                Some(name) => {
                    println!("Country: {name}");
                    println!("ISO2: {:?}", result.iso2);
                    println!("ISO3: {:?}", result.iso3);
                    println!("Continent: {:?}", result.continent);
                    println!("Timezone: {:?}", result.timezone);
                    println!("Confidence: {:.2}", result.confidence);
                }
                None => println!("No country found for ({lat}, {lon})"),
            }
        }

        Commands::Reverse { query, data_dir } => {
            let loader = open_loader(data_dir)?;
            let result = geo_intel_core::resolve_by_country(&query, Some(&loader))?;
            match &result.country {
                Some(name) => {
                    println!("Country: {name}");
                    println!("ISO2: {:?}", result.iso2);
                    println!("ISO3: {:?}", result.iso3);
                    println!("Continent: {:?}", result.continent);
                    println!("Timezone: {:?}", result.timezone);
                    println!("Centroid: ({:?}, {:?})", result.latitude, result.longitude);
                }
                None => println!("No country found for: {query}"),
            }
        }
    }

    Ok(())
}

fn open_loader(data_dir: Option<String>) -> anyhow::Result<Loader> {
    let dir = data_dir
        .map(PathBuf::from)
        .unwrap_or_else(Loader::default_data_dir);
    Ok(Loader::open(dir, LoaderFilter::default())?)
}
