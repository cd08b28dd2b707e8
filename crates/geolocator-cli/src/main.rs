//! geolocator: command-line interface for geolocator-core
//!
//! Resolves place names against a locally cached gazetteer (SQLite, built
//! from a downloadable JSON snapshot on first use).
//!
//! Usage examples
//! --------------
//!
//! - Show row counts of the cache
//!   $ geolocator stats
//!
//! - Resolve a city
//!   $ geolocator locate Vienna Illinois
//!   $ geolocator locate "Paris, TX"
//!
//! - Everything a phrase could mean
//!   $ geolocator locate-location --verbose "Hotels in Los Angeles"
//!
//! - Proximity
//!   $ geolocator nearest country 51.0 9.0 -n 3
//!   $ geolocator within city 48.8567 2.3522 400
//!
//! Data source
//! -----------
//!
//! The per-kind backups are downloaded into the cache directory
//! (`~/.geolocator` or `$GEOLOCATOR_CACHE_DIR`). `recreate-database` always
//! fetches them again. Use `--source <path-or-url>` to populate from a local
//! `.json`/`.json.gz` file or another URL instead.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use geolocator_core::loader::{default_source, source_for};
use geolocator_core::{BackupSource, Location, Locator, LocatorConfig, LookupMode, Point};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.debug);

    let mut config = LocatorConfig::from_env();
    if let Some(dir) = &args.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if args.correct_misspelling {
        config = config.with_correct_misspelling(true);
    }
    if args.folded {
        config = config.with_lookup_mode(LookupMode::Folded);
    }

    let source = backup_source(args.source.as_deref(), &config)?;
    tracing::debug!(source = %source.describe(), "backup source");
    let locator = Locator::with_source(config, source).context("opening reference store")?;

    match args.command {
        Commands::Stats => {
            let stats = locator.stats().context("reading reference store")?;
            println!("Reference store statistics:");
            println!("  Countries: {}", stats.countries);
            println!("  Regions: {}", stats.regions);
            println!("  Cities: {}", stats.cities);
            println!("  Duplicate ids: {}", stats.duplicates);
            if let Some(path) = locator.store().path() {
                println!("  Path: {}", path.display());
            }
        }

        Commands::RecreateDatabase => {
            locator.recreate_database().context("recreating reference store")?;
            let stats = locator.stats()?;
            println!(
                "Recreated: {} countries, {} regions, {} cities",
                stats.countries, stats.regions, stats.cities
            );
        }

        Commands::Locate { tokens } => match locator.locate_city(&split_tokens(&tokens))? {
            Some(city) => {
                println!("{}", city.display_name());
                println!("  id: {}", city.city.id);
                if let Some(pop) = city.city.population {
                    println!("  population: {pop}");
                }
                if let (Some(lat), Some(lon)) = (city.city.lat, city.city.lon) {
                    println!("  location: {lat:.4}, {lon:.4}");
                }
            }
            None => eprintln!("No city found for: {}", tokens.join(" ")),
        },

        Commands::LocateLocation { verbose, tokens } => {
            let hits = locator.locate_location(&tokens, verbose)?;
            if hits.is_empty() {
                println!("No locations found for: {}", tokens.join(" "));
            }
            for hit in &hits {
                println!("{}", describe(hit));
            }
        }

        Commands::Country { name } => match locator.get_country(&name)? {
            Some(c) => {
                println!("Country: {}", c.name);
                println!("ISO: {}", c.iso.as_deref().unwrap_or("-"));
                println!("Wikidata: {}", c.id);
                println!("Population: {:?}", c.population);
                let regions = locator.regions_of_country(&c.name)?;
                println!("Regions: {}", regions.len());
            }
            None => eprintln!("No country found for: {name}"),
        },

        Commands::Nearest { kind, lat, lon, n } => {
            let ctx = locator.context()?;
            for (hit, km) in ctx.nearest(kind, Point::new(lat, lon), n) {
                println!("{km:>10.1} km  {}", describe(&hit));
            }
        }

        Commands::Within {
            kind,
            lat,
            lon,
            radius_km,
        } => {
            let ctx = locator.context()?;
            let hits = ctx.within(kind, Point::new(lat, lon), radius_km);
            println!("{} {kind} entries within {radius_km} km", hits.len());
            for (hit, km) in hits {
                println!("{km:>10.1} km  {}", describe(&hit));
            }
        }
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let default = if debug { "geolocator_core=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `["Paris, TX"]` and `["Paris", "TX"]` mean the same thing.
fn split_tokens(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|t| t.split(','))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn describe(location: &Location) -> String {
    match location {
        Location::City(c) => format!("city     {} ({})", c.display_name(), c.city.id),
        Location::Region(r) => format!(
            "region   {} [{}] {}",
            r.region.name,
            r.iso().unwrap_or("-"),
            r.country.as_ref().map(|c| c.name.as_str()).unwrap_or("")
        ),
        Location::Country(c) => format!("country  {} [{}]", c.name, c.iso.as_deref().unwrap_or("-")),
    }
}

/// `--source` may be a local `.json`/`.json.gz` file or a URL; without it the
/// per-kind backups are downloaded into the cache directory.
fn backup_source(location: Option<&str>, config: &LocatorConfig) -> anyhow::Result<Box<dyn BackupSource>> {
    match location {
        Some(loc) => source_for(loc, config).with_context(|| format!("using backup source {loc}")),
        None => Ok(default_source(config)),
    }
}
