//! geolocator-cli
//! ==============
//!
//! Command-line interface for the `geolocator-core` place-name resolver.
//!
//! This crate primarily provides a binary (`geolocator`). We include a small
//! library target so that docs.rs renders a documentation page and shows this
//! overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! cargo install geolocator-cli
//! geolocator --help
//! geolocator stats
//! geolocator locate Vienna Illinois
//! geolocator locate-location --verbose "Hotels in Los Angeles"
//! geolocator nearest country 51.0 9.0 -n 3
//! ```
//!
//! For programmatic access use the [`geolocator-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the primary
// deliverable.
