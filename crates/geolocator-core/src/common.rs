// crates/geolocator-core/src/common.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple aggregate statistics for the reference data.
///
/// Returned by [`ReferenceStore::stats`](crate::store::ReferenceStore::stats)
/// and [`LocationContext::stats`](crate::context::LocationContext::stats).
/// `duplicates` counts rows whose identifier was already taken by an earlier
/// row of the same kind; those rows are kept in storage but ignored by the
/// identifier maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub countries: usize,
    pub regions: usize,
    pub cities: usize,
    pub duplicates: usize,
}

/// The three collections of the gazetteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Country,
    Region,
    City,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Country, EntityKind::Region, EntityKind::City];

    /// Base table holding this kind in the reference store.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Country => "countries",
            EntityKind::Region => "regions",
            EntityKind::City => "cities",
        }
    }

    /// Materialized lookup table for this kind.
    pub fn lookup_table(self) -> &'static str {
        match self {
            EntityKind::Country => "CountryLookup",
            EntityKind::Region => "RegionLookup",
            EntityKind::City => "CityLookup",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Country => "country",
            EntityKind::Region => "region",
            EntityKind::City => "city",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = crate::error::GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "country" | "countries" => Ok(EntityKind::Country),
            "region" | "regions" | "state" | "states" => Ok(EntityKind::Region),
            "city" | "cities" => Ok(EntityKind::City),
            other => Err(crate::error::GeoError::InvalidInput(format!(
                "unknown entity kind '{other}'"
            ))),
        }
    }
}
