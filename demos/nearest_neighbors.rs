//! Nearest-neighbour example for geolocator-rs
//!
//! Shows proximity queries over the in-memory gazetteer and the plain
//! distance helpers.
//!
//!   cargo run --example nearest_neighbors -- crates/geolocator-core/tests/fixtures/snapshot.json

use geolocator_core::{distance_km, EntityKind, JsonFileSource, Locator, LocatorConfig, Point, Result};

fn main() -> Result<()> {
    println!("=== geolocator-rs Nearest Neighbors Example ===\n");

    let locator = match std::env::args().nth(1) {
        Some(path) => {
            let config = LocatorConfig::from_env().with_min_counts(1, 1, 1);
            Locator::in_memory(config, Box::new(JsonFileSource::new(path)))?
        }
        None => Locator::new(LocatorConfig::from_env())?,
    };
    let ctx = locator.context()?;

    // Example 1: Distances
    println!("--- Example 1: Great-circle distance ---");
    let paris = Point::new(48.8567, 2.3508);
    let london = Point::new(51.5072, -0.1275);
    println!("Paris → London: {:.1} km\n", distance_km(paris, london));

    // Example 2: k nearest countries
    println!("--- Example 2: Countries nearest to Germany's centroid ---");
    for (hit, km) in ctx.nearest(EntityKind::Country, Point::new(51.0, 9.0), 3) {
        println!("  {:>8.1} km  {}", km, hit.name());
    }
    println!();

    // Example 3: radius search
    println!("--- Example 3: Cities within 400 km of Paris ---");
    let hits = ctx.within(EntityKind::City, paris, 400.0);
    for (hit, km) in hits.iter().take(10) {
        println!("  {:>8.1} km  {}", km, hit.name());
    }
    println!("  {} total", hits.len());

    println!("\n=== Example completed successfully ===");
    Ok(())
}
