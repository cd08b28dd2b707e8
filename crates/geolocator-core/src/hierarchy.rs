// crates/geolocator-core/src/hierarchy.rs

//! # Hierarchy Linker
//!
//! Resolves the foreign-key identifiers of regions and cities into indices
//! of the parent repositories. Links are stored as parallel arrays
//! ("Structure of Arrays"): `city_region[i]` is the region index of
//! `cities[i]`, and so on. Entities themselves are never mutated.

use crate::model::{City, Country, Region};
use crate::repository::Repository;
use tracing::{debug, warn};

/// Outcome counters of one linking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Rows ignored by the identifier maps because their id was taken.
    pub duplicates: usize,
    /// Foreign keys that were set but matched no parent.
    pub unresolved: usize,
    /// Regions that received their country from one of their cities.
    pub propagated: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    region_country: Vec<Option<usize>>,
    city_region: Vec<Option<usize>>,
    city_country: Vec<Option<usize>>,
}

impl Hierarchy {
    /// Builds all links from scratch; collections may come in any order and
    /// re-running on the same input yields the same links.
    pub fn link(
        countries: &Repository<Country>,
        regions: &Repository<Region>,
        cities: &Repository<City>,
    ) -> (Self, LinkReport) {
        let mut report = LinkReport {
            duplicates: countries.duplicate_count()
                + regions.duplicate_count()
                + cities.duplicate_count(),
            ..LinkReport::default()
        };

        // ID Lookup!
        let mut resolve = |key: Option<&str>, lookup: &dyn Fn(&str) -> Option<usize>| match key {
            Some(id) => {
                let hit = lookup(id);
                if hit.is_none() {
                    report.unresolved += 1;
                }
                hit
            }
            None => None,
        };

        let country_idx = |id: &str| countries.index_of(id);
        let region_idx = |id: &str| regions.index_of(id);

        let mut region_country: Vec<Option<usize>> = regions
            .iter()
            .map(|r| resolve(r.country_id.as_deref(), &country_idx))
            .collect();

        let mut city_region = Vec::with_capacity(cities.len());
        let mut city_country = Vec::with_capacity(cities.len());
        for city in cities.iter() {
            city_region.push(resolve(city.region_id.as_deref(), &region_idx));
            city_country.push(resolve(city.country_id.as_deref(), &country_idx));
        }

        // Region-level country metadata is sometimes missing upstream.
        for (region, country) in city_region.iter().zip(&city_country) {
            if let (Some(r), Some(c)) = (region, country) {
                if region_country[*r].is_none() {
                    region_country[*r] = Some(*c);
                    report.propagated += 1;
                }
            }
        }

        if report.unresolved > 0 {
            debug!(unresolved = report.unresolved, "foreign keys without a parent");
        }
        if report.duplicates > 0 {
            warn!(duplicates = report.duplicates, "linked with duplicate identifiers");
        }

        (
            Self {
                region_country,
                city_region,
                city_country,
            },
            report,
        )
    }

    pub fn country_of_region(&self, region: usize) -> Option<usize> {
        self.region_country.get(region).copied().flatten()
    }

    pub fn region_of_city(&self, city: usize) -> Option<usize> {
        self.city_region.get(city).copied().flatten()
    }

    pub fn country_of_city(&self, city: usize) -> Option<usize> {
        self.city_country.get(city).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(id: &str, iso: &str) -> Country {
        Country {
            id: id.into(),
            name: iso.into(),
            iso: Some(iso.into()),
            lat: None,
            lon: None,
            population: None,
        }
    }

    fn region(id: &str, country_id: Option<&str>) -> Region {
        Region {
            id: id.into(),
            name: id.into(),
            iso: None,
            lat: None,
            lon: None,
            population: None,
            country_id: country_id.map(str::to_string),
        }
    }

    fn city(id: &str, region_id: Option<&str>, country_id: Option<&str>) -> City {
        City {
            id: id.into(),
            name: id.into(),
            labels: Vec::new(),
            lat: None,
            lon: None,
            population: None,
            region_id: region_id.map(str::to_string),
            country_id: country_id.map(str::to_string),
        }
    }

    fn fixture() -> (Repository<Country>, Repository<Region>, Repository<City>) {
        (
            Repository::new(vec![country("Q30", "US"), country("Q32", "LU")]),
            Repository::new(vec![
                region("Q99", Some("Q30")),
                region("R-LU", None),
                region("R-X", Some("Q404")),
            ]),
            Repository::new(vec![
                city("Q65", Some("Q99"), Some("Q30")),
                city("Q1842", Some("R-LU"), Some("Q32")),
                city("Atlantis", Some("Q0"), Some("Q0")),
                city("Nowhere", None, None),
            ]),
        )
    }

    #[test]
    fn test_links_and_unresolved() {
        let (countries, regions, cities) = fixture();
        let (h, report) = Hierarchy::link(&countries, &regions, &cities);

        assert_eq!(h.country_of_region(0), Some(0));
        assert_eq!(h.region_of_city(0), Some(0));
        assert_eq!(h.country_of_city(0), Some(0));

        // Unresolvable keys stay None without failing.
        assert_eq!(h.region_of_city(2), None);
        assert_eq!(h.country_of_city(2), None);
        assert_eq!(h.region_of_city(3), None);
        assert_eq!(h.country_of_region(2), None);
        assert_eq!(report.unresolved, 3);
    }

    #[test]
    fn test_country_propagates_from_city_to_region() {
        let (countries, regions, cities) = fixture();
        let (h, report) = Hierarchy::link(&countries, &regions, &cities);
        assert_eq!(h.country_of_region(1), Some(1));
        assert_eq!(report.propagated, 1);
    }

    #[test]
    fn test_link_is_idempotent() {
        let (countries, regions, cities) = fixture();
        let (a, ra) = Hierarchy::link(&countries, &regions, &cities);
        let (b, rb) = Hierarchy::link(&countries, &regions, &cities);
        assert_eq!(ra, rb);
        for i in 0..cities.len() {
            assert_eq!(a.region_of_city(i), b.region_of_city(i));
            assert_eq!(a.country_of_city(i), b.country_of_city(i));
        }
    }

    #[test]
    fn test_out_of_range_is_none() {
        let h = Hierarchy::default();
        assert_eq!(h.country_of_city(7), None);
    }
}
