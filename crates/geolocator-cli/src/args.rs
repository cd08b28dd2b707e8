use clap::{Parser, Subcommand};
use geolocator_core::EntityKind;
use std::path::PathBuf;

/// CLI arguments for geolocator
#[derive(Debug, Parser)]
#[command(
    name = "geolocator",
    version,
    about = "Resolve ambiguous place names into cities, regions and countries"
)]
pub struct CliArgs {
    /// Cache directory holding the SQLite reference store (default: ~/.geolocator)
    #[arg(long = "cache-dir", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Backup snapshot to populate from: a local .json/.json.gz file or a URL
    #[arg(short = 's', long = "source", global = true)]
    pub source: Option<String>,

    /// Correct common country misspellings before lookup
    #[arg(long = "correct-misspelling", global = true)]
    pub correct_misspelling: bool,

    /// Match names case- and accent-insensitively
    #[arg(long = "folded", global = true)]
    pub folded: bool,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show row counts of the reference store
    Stats,

    /// Rebuild the reference store, fetching the backup again from upstream
    RecreateDatabase,

    /// Resolve tokens to a single city (e.g. `locate Vienna Illinois`)
    Locate {
        /// Place tokens; a single comma-separated argument works too
        #[arg(required = true)]
        tokens: Vec<String>,
    },

    /// List every city, region and country the tokens could refer to
    LocateLocation {
        /// Also try adjacent word pairs ("Los Angeles")
        #[arg(short, long)]
        verbose: bool,

        #[arg(required = true)]
        tokens: Vec<String>,
    },

    /// Look up a country by name, alias or ISO code
    Country {
        /// e.g. Germany, USA, DE
        name: String,
    },

    /// Nearest entities to a coordinate
    Nearest {
        /// country, region or city
        kind: EntityKind,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        /// Number of results
        #[arg(short = 'n', long = "count", default_value_t = 5)]
        n: usize,
    },

    /// Entities within a radius (km) of a coordinate
    Within {
        /// country, region or city
        kind: EntityKind,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        radius_km: f64,
    },
}
