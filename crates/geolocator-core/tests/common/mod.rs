// crates/geolocator-core/tests/common/mod.rs
#![allow(dead_code)]

use geolocator_core::{JsonFileSource, Locator, LocatorConfig, Snapshot};
use std::path::PathBuf;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/snapshot.json")
}

pub fn snapshot() -> Snapshot {
    let text = std::fs::read_to_string(fixture_path()).expect("fixture readable");
    serde_json::from_str(&text).expect("fixture parses")
}

/// Thresholds low enough for the fixture.
pub fn config() -> LocatorConfig {
    LocatorConfig::default().with_min_counts(5, 5, 5)
}

pub fn locator() -> Locator {
    Locator::in_memory(config(), Box::new(JsonFileSource::new(fixture_path()))).expect("locator")
}

/// A locator backed by an on-disk cache in `dir`.
pub fn locator_in(dir: &std::path::Path) -> Locator {
    let config = config().with_cache_dir(dir);
    Locator::with_source(config, Box::new(JsonFileSource::new(fixture_path()))).expect("locator")
}
