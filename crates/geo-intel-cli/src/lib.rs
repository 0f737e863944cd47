//! geo-intel-cli
//! =============
//!
//! Command-line interface for the `geo-intel-core` offline geocoding
//! engine.
//!
//! This crate primarily provides a binary (`geo-intel`). We include a small
//! library target so that docs.rs renders a documentation page and shows
//! this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! geo-intel build countries.geojson ./data
//! geo-intel resolve 40.7128 -74.0060
//! geo-intel reverse US
//! ```
//!
//! For programmatic access to the resolvers, use the [`geo-intel-core`]
//! crate directly.
//!
//! Links
//! -----
//! - Core crate: <https://docs.rs/geo-intel-core>
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the
// primary deliverable. The presence of this file enables a rendered page on
// docs.rs.
