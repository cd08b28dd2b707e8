//! Error handling example for geolocator-rs
//!
//! This example demonstrates the error cases of the locator and how a
//! missing or unreachable backup surfaces.

use geolocator_core::{GeoError, JsonFileSource, Locator, LocatorConfig, Result};

fn main() -> Result<()> {
    println!("=== geolocator-rs Error Handling Example ===\n");

    // Example 1: No reference data at all
    println!("--- Example 1: Backup unavailable ---");
    let config = LocatorConfig::default();
    let offline = Locator::in_memory(config, Box::new(JsonFileSource::new("/nonexistent/locations.json")))?;
    match offline.locate_city(&["Berlin"]) {
        Ok(hit) => println!("  Unexpected result: {hit:?}"),
        Err(e) if e.is_data_unavailable() => println!("✓ Data unavailable: {e}"),
        Err(e) => return Err(e),
    }
    println!();

    let locator = Locator::new(LocatorConfig::from_env())?;

    // Example 2: Empty input is an error, not "no match"
    println!("--- Example 2: Empty token list ---");
    let empty: [&str; 0] = [];
    match locator.locate_city(&empty) {
        Err(GeoError::InvalidInput(msg)) => println!("✓ Rejected: {msg}"),
        other => println!("  Unexpected: {other:?}"),
    }
    println!();

    // Example 3: Unknown names are simply absent
    println!("--- Example 3: Unknown places ---");
    for name in ["Atlantis", "Gondor", "XX"] {
        match locator.locate_city(&[name])? {
            Some(city) => println!("  Found: {}", city.display_name()),
            None => println!("  Not found: {name}"),
        }
    }
    println!();

    // Example 4: Kind parsing
    println!("--- Example 4: Parsing entity kinds ---");
    for kind in ["city", "States", "planet"] {
        match kind.parse::<geolocator_core::EntityKind>() {
            Ok(k) => println!("  {kind:<8} → {k}"),
            Err(e) => println!("  {kind:<8} → error: {e}"),
        }
    }

    println!("\n=== Example completed successfully ===");
    Ok(())
}
