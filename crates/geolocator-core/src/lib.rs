// crates/geolocator-core/src/lib.rs

//! Resolve ambiguous place names ("Vienna", "Paris, TX") into linked city,
//! region and country records.
//!
//! The usual entry point is [`Locator`]. [`LocationContext`] is the in-memory
//! linked gazetteer behind `locate_location` and the proximity queries.

pub mod alias;
pub mod common;
pub mod config;
pub mod context;
pub mod disambiguate;
pub mod error;
pub mod hierarchy;
pub mod loader; // Backup sources (file, HTTP)
pub mod locator;
pub mod model;
pub mod places;
pub mod repository;
pub mod spatial;
pub mod store; // SQLite cache
pub mod text;
pub mod traits;

// Re-exports
pub use crate::common::{DbStats, EntityKind};
pub use crate::config::{LocatorConfig, LookupMode, MinCounts};
pub use crate::context::LocationContext;
pub use crate::disambiguate::disambiguate;
pub use crate::error::{GeoError, Result};
pub use crate::hierarchy::{Hierarchy, LinkReport};
pub use crate::locator::Locator;
pub use crate::model::raw::Snapshot;
pub use crate::model::{City, CityContext, Country, Location, Record, Region, RegionContext};
pub use crate::places::PlaceContext;
pub use crate::repository::Repository;
pub use crate::spatial::{distance_between, distance_km, haversine, Point, SpatialIndex};
pub use crate::store::ReferenceStore;
// Export the traits (needed for `.point()`, `.population()`, ...)
pub use crate::traits::{Entity, HasCoordinates, HasPopulation, NameMatch};

pub use crate::loader::{BackupSource, JsonFileSource};
#[cfg(feature = "fetch")]
pub use crate::loader::HttpSource;
