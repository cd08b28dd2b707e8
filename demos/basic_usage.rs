//! Basic usage example for geolocator-rs
//!
//! This example demonstrates how to:
//! - Open (and on first use populate) the reference store
//! - Resolve ambiguous city names with country and region hints
//! - Ask for everything a phrase could refer to
//! - Classify a bag of place names with `PlaceContext`
//!
//! Pass a local snapshot to avoid the download:
//!   cargo run --example basic_usage -- crates/geolocator-core/tests/fixtures/snapshot.json

use geolocator_core::{JsonFileSource, Locator, LocatorConfig, PlaceContext, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    println!("=== geolocator-rs Basic Usage Example ===\n");

    let locator = match std::env::args().nth(1) {
        Some(path) => {
            let config = LocatorConfig::from_env().with_min_counts(1, 1, 1);
            Locator::in_memory(config, Box::new(JsonFileSource::new(path)))?
        }
        None => Locator::new(LocatorConfig::from_env())?,
    };

    let stats = locator.stats()?;
    println!(
        "✓ Reference data ready: {} countries, {} regions, {} cities\n",
        stats.countries, stats.regions, stats.cities
    );

    // Example 1: Same name, different hints
    println!("--- Example 1: Disambiguating Vienna ---");
    for tokens in [
        vec!["Vienna"],
        vec!["Vienna", "Austria"],
        vec!["Vienna", "Illinois"],
        vec!["Vienna", "USA"],
    ] {
        match locator.locate_city(&tokens)? {
            Some(city) => println!("{:<24} → {}", tokens.join(", "), city.display_name()),
            None => println!("{:<24} → (no match)", tokens.join(", ")),
        }
    }
    println!();

    // Example 2: ISO codes as hints
    println!("--- Example 2: Region codes ---");
    if let Some(city) = locator.locate_city_str("Paris, TX")? {
        println!("Paris, TX → {} (population {:?})", city.display_name(), city.city.population);
    }
    println!();

    // Example 3: Broad search
    println!("--- Example 3: Everything matching a phrase ---");
    for hit in locator.locate_location(&["Hotels in Los Angeles"], true)? {
        println!("  {:<8} {}", hit.kind(), hit.name());
    }
    println!();

    // Example 4: Place classification
    println!("--- Example 4: PlaceContext ---");
    let places = ["Germany", "Bavaria", "Munich", "Berlin", "Gondor"];
    let ctx = PlaceContext::classify(&locator, &places)?;
    println!("{ctx}");
    for address in &ctx.address_strings {
        println!("  address: {address}");
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
