// crates/geolocator-core/src/model/mod.rs

//! # Domain Model
//!
//! Plain records for the three gazetteer kinds. Parent links are stored as
//! foreign-key identifiers only; resolved parents live in the
//! [`Hierarchy`](crate::hierarchy::Hierarchy) (index links) or in the owned
//! [`CityContext`] / [`RegionContext`] views handed out by queries.

pub mod convert;
pub mod raw;

use crate::common::EntityKind;
use crate::spatial::Point;
use crate::traits::{Entity, HasCoordinates, HasPopulation, NameMatch};
use serde::{Deserialize, Serialize};

/// A Country entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
    /// ISO 3166-1 alpha-2 code, e.g. "AT".
    pub iso: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub population: Option<u64>,
}

/// A first-order administrative subdivision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    /// Composite ISO 3166-2 code, e.g. "US-CA".
    pub iso: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub population: Option<u64>,
    pub country_id: Option<String>,
}

/// A City entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    /// Alternate names ("Wien", "LA", ...). May be empty.
    #[serde(default)]
    pub labels: Vec<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub population: Option<u64>,
    pub region_id: Option<String>,
    pub country_id: Option<String>,
}

impl Country {
    pub fn iso(&self) -> Option<&str> {
        self.iso.as_deref()
    }
}

impl Region {
    pub fn iso(&self) -> Option<&str> {
        self.iso.as_deref()
    }
}

impl City {
    /// `true` if `label` is the city's name or one of its alternate labels.
    pub fn is_known_as(&self, label: &str) -> bool {
        self.name == label || self.labels.iter().any(|l| l == label)
    }
}

fn point_of(lat: Option<f64>, lon: Option<f64>) -> Option<Point> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(Point::new(lat, lon)),
        _ => None,
    }
}

// ---- TRAIT IMPLS ----

macro_rules! impl_common {
    ($ty:ty) => {
        impl NameMatch for $ty {
            fn name_str(&self) -> &str {
                &self.name
            }
        }

        impl HasCoordinates for $ty {
            fn point(&self) -> Option<Point> {
                point_of(self.lat, self.lon)
            }
        }

        impl HasPopulation for $ty {
            fn population(&self) -> Option<u64> {
                self.population
            }
        }
    };
}

impl_common!(Country);
impl_common!(Region);
impl_common!(City);

impl Entity for Country {
    const KIND: EntityKind = EntityKind::Country;

    fn id(&self) -> &str {
        &self.id
    }

    fn iso(&self) -> Option<&str> {
        self.iso.as_deref()
    }
}

impl Entity for Region {
    const KIND: EntityKind = EntityKind::Region;

    fn id(&self) -> &str {
        &self.id
    }

    fn iso(&self) -> Option<&str> {
        self.iso.as_deref()
    }
}

impl Entity for City {
    const KIND: EntityKind = EntityKind::City;

    fn id(&self) -> &str {
        &self.id
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

// ---- RESOLVED VIEWS ----

/// A City together with its resolved parents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityContext {
    pub city: City,
    pub region: Option<Region>,
    pub country: Option<Country>,
}

impl CityContext {
    pub fn name(&self) -> &str {
        &self.city.name
    }

    pub fn country_iso(&self) -> Option<&str> {
        self.country.as_ref().and_then(Country::iso)
    }

    pub fn region_iso(&self) -> Option<&str> {
        self.region.as_ref().and_then(Region::iso)
    }

    pub fn region_name(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.name.as_str())
    }

    /// "City, Region, Country" with missing parts left out.
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.city.name.as_str()];
        if let Some(r) = &self.region {
            parts.push(&r.name);
        }
        if let Some(c) = &self.country {
            parts.push(&c.name);
        }
        parts.join(", ")
    }
}

impl HasPopulation for CityContext {
    fn population(&self) -> Option<u64> {
        self.city.population
    }
}

/// A Region together with its resolved Country.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionContext {
    pub region: Region,
    pub country: Option<Country>,
}

impl RegionContext {
    pub fn iso(&self) -> Option<&str> {
        self.region.iso()
    }

    pub fn country_iso(&self) -> Option<&str> {
        self.country.as_ref().and_then(Country::iso)
    }
}

/// One hit of a broad "what could this be" query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    City(CityContext),
    Region(RegionContext),
    Country(Country),
}

impl Location {
    pub fn kind(&self) -> EntityKind {
        match self {
            Location::City(_) => EntityKind::City,
            Location::Region(_) => EntityKind::Region,
            Location::Country(_) => EntityKind::Country,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Location::City(c) => &c.city.name,
            Location::Region(r) => &r.region.name,
            Location::Country(c) => &c.name,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Location::City(c) => &c.city.id,
            Location::Region(r) => &r.region.id,
            Location::Country(c) => &c.id,
        }
    }
}

/// A single unresolved row of any kind, as returned by id lookups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Country(Country),
    Region(Region),
    City(City),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Country(_) => EntityKind::Country,
            Record::Region(_) => EntityKind::Region,
            Record::City(_) => EntityKind::City,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::Country(c) => &c.name,
            Record::Region(r) => &r.name,
            Record::City(c) => &c.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, labels: &[&str]) -> City {
        City {
            id: "Q1".into(),
            name: name.into(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            lat: Some(48.2),
            lon: None,
            population: None,
            region_id: None,
            country_id: None,
        }
    }

    #[test]
    fn test_is_known_as() {
        let vienna = city("Vienna", &["Wien", "Vienne"]);
        assert!(vienna.is_known_as("Vienna"));
        assert!(vienna.is_known_as("Wien"));
        assert!(!vienna.is_known_as("wien"));
        assert!(vienna.is_named("VIENNA"));
    }

    #[test]
    fn test_point_requires_both_coordinates() {
        let vienna = city("Vienna", &[]);
        assert!(vienna.point().is_none());
        assert_eq!(vienna.population_or_zero(), 0);
    }

    #[test]
    fn test_display_name() {
        let ctx = CityContext {
            city: city("Vienna", &[]),
            region: None,
            country: Some(Country {
                id: "Q40".into(),
                name: "Austria".into(),
                iso: Some("AT".into()),
                lat: None,
                lon: None,
                population: None,
            }),
        };
        assert_eq!(ctx.display_name(), "Vienna, Austria");
        assert_eq!(ctx.country_iso(), Some("AT"));
        assert_eq!(ctx.region_iso(), None);
    }
}
