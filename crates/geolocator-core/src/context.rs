// crates/geolocator-core/src/context.rs

//! # Location Context
//!
//! The fully loaded, cross-linked gazetteer held in memory: three
//! [`Repository`]s plus the [`Hierarchy`] between them. Built once per
//! (re)population and shared read-only afterwards.

use crate::common::{DbStats, EntityKind};
use crate::config::LookupMode;
use crate::error::Result;
use crate::hierarchy::{Hierarchy, LinkReport};
use crate::model::raw::Snapshot;
use crate::model::{convert, City, CityContext, Country, Location, Region, RegionContext};
use crate::repository::Repository;
use crate::spatial::Point;
use crate::store::ReferenceStore;
use crate::text::{is_iso_code, location_parts};
use crate::traits::HasPopulation;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug)]
pub struct LocationContext {
    countries: Repository<Country>,
    regions: Repository<Region>,
    cities: Repository<City>,
    hierarchy: Hierarchy,
    report: LinkReport,
    lookup_mode: LookupMode,
}

impl LocationContext {
    pub fn new(countries: Vec<Country>, regions: Vec<Region>, cities: Vec<City>) -> Self {
        let countries = Repository::new(countries);
        let regions = Repository::new(regions);
        let cities = Repository::new(cities);
        let (hierarchy, report) = Hierarchy::link(&countries, &regions, &cities);
        Self {
            countries,
            regions,
            cities,
            hierarchy,
            report,
            lookup_mode: LookupMode::Exact,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let (countries, regions, cities) = convert::from_snapshot(snapshot);
        Self::new(countries, regions, cities)
    }

    /// Loads all three collections from a populated store.
    pub fn from_store(store: &ReferenceStore) -> Result<Self> {
        let ctx = Self::new(store.load_countries()?, store.load_regions()?, store.load_cities()?)
            .with_lookup_mode(store.lookup_mode());
        debug!(stats = ?ctx.stats(), "location context loaded");
        Ok(ctx)
    }

    pub fn with_lookup_mode(mut self, mode: LookupMode) -> Self {
        self.lookup_mode = mode;
        self
    }

    /// Replaces the collections and re-links; derived indexes are rebuilt.
    pub fn reload(&mut self, countries: Vec<Country>, regions: Vec<Region>, cities: Vec<City>) {
        self.countries.reload(countries);
        self.regions.reload(regions);
        self.cities.reload(cities);
        let (hierarchy, report) = Hierarchy::link(&self.countries, &self.regions, &self.cities);
        self.hierarchy = hierarchy;
        self.report = report;
    }

    pub fn countries(&self) -> &Repository<Country> {
        &self.countries
    }

    pub fn regions(&self) -> &Repository<Region> {
        &self.regions
    }

    pub fn cities(&self) -> &Repository<City> {
        &self.cities
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn link_report(&self) -> LinkReport {
        self.report
    }

    pub fn stats(&self) -> DbStats {
        DbStats {
            countries: self.countries.len(),
            regions: self.regions.len(),
            cities: self.cities.len(),
            duplicates: self.report.duplicates,
        }
    }

    // ---- RESOLVED VIEWS ----

    pub fn region_context(&self, idx: usize) -> Option<RegionContext> {
        let region = self.regions.get(idx)?.clone();
        let country = self
            .hierarchy
            .country_of_region(idx)
            .and_then(|c| self.countries.get(c))
            .cloned();
        Some(RegionContext { region, country })
    }

    pub fn city_context(&self, idx: usize) -> Option<CityContext> {
        let city = self.cities.get(idx)?.clone();
        let region = self
            .hierarchy
            .region_of_city(idx)
            .and_then(|r| self.regions.get(r))
            .cloned();
        let country = self
            .hierarchy
            .country_of_city(idx)
            .and_then(|c| self.countries.get(c))
            .cloned();
        Some(CityContext {
            city,
            region,
            country,
        })
    }

    // ---- NAME QUERIES ----

    pub fn get_countries(&self, name: &str) -> Vec<Country> {
        self.countries
            .by_name(name, self.lookup_mode)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn get_regions(&self, name: &str) -> Vec<RegionContext> {
        self.regions
            .indices_by_name(name, self.lookup_mode)
            .iter()
            .filter_map(|&idx| self.region_context(idx))
            .collect()
    }

    /// Cities named or labelled `name`, with their parents.
    pub fn get_cities(&self, name: &str) -> Vec<CityContext> {
        self.cities
            .indices_by_name(name, self.lookup_mode)
            .iter()
            .filter_map(|&idx| self.city_context(idx))
            .collect()
    }

    /// Regions linked to the country called `country_name`.
    pub fn regions_of_country(&self, country_name: &str) -> Vec<&Region> {
        let wanted: HashSet<usize> = self
            .countries
            .indices_by_name(country_name, self.lookup_mode)
            .iter()
            .copied()
            .collect();
        self.regions
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                self.hierarchy
                    .country_of_region(*idx)
                    .is_some_and(|c| wanted.contains(&c))
            })
            .map(|(_, r)| r)
            .collect()
    }

    // ---- BROAD SEARCH ----

    /// Everything the tokens could refer to.
    ///
    /// Regions and countries already implied by a matched city are dropped,
    /// as are countries implied by a matched region. Cities come first (most
    /// populous first), then regions, then countries.
    pub fn locate_location<S: AsRef<str>>(&self, tokens: &[S], verbose: bool) -> Vec<Location> {
        let parts = location_parts(tokens, verbose);

        let mut cities: Vec<usize> = Vec::new();
        let mut regions: Vec<usize> = Vec::new();
        let mut countries: Vec<usize> = Vec::new();

        for part in &parts {
            let part = part.as_str();
            if is_iso_code(part) {
                push_unique(&mut regions, self.regions.indices_by_iso(part));
                push_unique(&mut countries, self.countries.indices_by_iso(part));
            }
            push_unique(&mut cities, self.cities.indices_by_name(part, self.lookup_mode));
            push_unique(&mut regions, self.regions.indices_by_name(part, self.lookup_mode));
            push_unique(&mut countries, self.countries.indices_by_name(part, self.lookup_mode));
        }

        let implied_regions: HashSet<usize> = cities
            .iter()
            .filter_map(|&c| self.hierarchy.region_of_city(c))
            .collect();
        let mut implied_countries: HashSet<usize> = cities
            .iter()
            .filter_map(|&c| self.hierarchy.country_of_city(c))
            .collect();
        regions.retain(|r| !implied_regions.contains(r));
        implied_countries.extend(
            regions
                .iter()
                .filter_map(|&r| self.hierarchy.country_of_region(r)),
        );
        countries.retain(|c| !implied_countries.contains(c));

        let mut city_hits: Vec<CityContext> = cities
            .into_iter()
            .filter_map(|idx| self.city_context(idx))
            .collect();
        // Stable: equal populations keep discovery order.
        city_hits.sort_by(|a, b| b.population_or_zero().cmp(&a.population_or_zero()));

        debug!(
            parts = parts.len(),
            cities = city_hits.len(),
            regions = regions.len(),
            countries = countries.len(),
            "locate_location"
        );

        city_hits
            .into_iter()
            .map(Location::City)
            .chain(
                regions
                    .into_iter()
                    .filter_map(|idx| self.region_context(idx))
                    .map(Location::Region),
            )
            .chain(
                countries
                    .into_iter()
                    .filter_map(|idx| self.countries.get(idx).cloned())
                    .map(Location::Country),
            )
            .collect()
    }

    // ---- PROXIMITY ----

    /// `n` nearest entities of `kind` around `point`.
    pub fn nearest(&self, kind: EntityKind, point: Point, n: usize) -> Vec<(Location, f64)> {
        match kind {
            EntityKind::Country => self
                .countries
                .spatial_index()
                .k_nearest(point, n)
                .into_iter()
                .filter_map(|(i, d)| Some((Location::Country(self.countries.get(i)?.clone()), d)))
                .collect(),
            EntityKind::Region => self
                .regions
                .spatial_index()
                .k_nearest(point, n)
                .into_iter()
                .filter_map(|(i, d)| Some((Location::Region(self.region_context(i)?), d)))
                .collect(),
            EntityKind::City => self
                .cities
                .spatial_index()
                .k_nearest(point, n)
                .into_iter()
                .filter_map(|(i, d)| Some((Location::City(self.city_context(i)?), d)))
                .collect(),
        }
    }

    /// Entities of `kind` within `radius_km` of `point`.
    pub fn within(&self, kind: EntityKind, point: Point, radius_km: f64) -> Vec<(Location, f64)> {
        match kind {
            EntityKind::Country => self
                .countries
                .spatial_index()
                .within_radius(point, radius_km)
                .into_iter()
                .filter_map(|(i, d)| Some((Location::Country(self.countries.get(i)?.clone()), d)))
                .collect(),
            EntityKind::Region => self
                .regions
                .spatial_index()
                .within_radius(point, radius_km)
                .into_iter()
                .filter_map(|(i, d)| Some((Location::Region(self.region_context(i)?), d)))
                .collect(),
            EntityKind::City => self
                .cities
                .spatial_index()
                .within_radius(point, radius_km)
                .into_iter()
                .filter_map(|(i, d)| Some((Location::City(self.city_context(i)?), d)))
                .collect(),
        }
    }
}

fn push_unique(target: &mut Vec<usize>, hits: &[usize]) {
    for &idx in hits {
        if !target.contains(&idx) {
            target.push(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> LocationContext {
        let countries = vec![
            Country {
                id: "Q40".into(),
                name: "Austria".into(),
                iso: Some("AT".into()),
                lat: Some(47.58),
                lon: Some(14.11),
                population: Some(8_935_112),
            },
            Country {
                id: "Q30".into(),
                name: "United States of America".into(),
                iso: Some("US".into()),
                lat: Some(39.83),
                lon: Some(-98.58),
                population: Some(331_449_281),
            },
        ];
        let regions = vec![
            Region {
                id: "R-AT9".into(),
                name: "Vienna".into(),
                iso: Some("AT-9".into()),
                lat: None,
                lon: None,
                population: None,
                country_id: Some("Q40".into()),
            },
            Region {
                id: "Q1204".into(),
                name: "Illinois".into(),
                iso: Some("US-IL".into()),
                lat: None,
                lon: None,
                population: None,
                country_id: Some("Q30".into()),
            },
        ];
        let cities = vec![
            City {
                id: "Q1741".into(),
                name: "Vienna".into(),
                labels: vec!["Wien".into()],
                lat: Some(48.2082),
                lon: Some(16.3738),
                population: Some(1_897_491),
                region_id: Some("R-AT9".into()),
                country_id: Some("Q40".into()),
            },
            City {
                id: "Q577800".into(),
                name: "Vienna".into(),
                labels: Vec::new(),
                lat: Some(37.4159),
                lon: Some(-88.8978),
                population: Some(1_434),
                region_id: Some("Q1204".into()),
                country_id: Some("Q30".into()),
            },
        ];
        LocationContext::new(countries, regions, cities)
    }

    #[test]
    fn test_get_cities_resolves_parents() {
        let ctx = ctx();
        let hits = ctx.get_cities("Vienna");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].country_iso(), Some("AT"));
        assert_eq!(hits[1].region_iso(), Some("US-IL"));
        assert_eq!(ctx.get_cities("Wien")[0].city.id, "Q1741");
    }

    #[test]
    fn test_locate_location_prunes_implied_parents() {
        let ctx = ctx();
        let hits = ctx.locate_location(&["Vienna, Austria"], false);
        let kinds: Vec<EntityKind> = hits.iter().map(Location::kind).collect();
        assert_eq!(kinds, vec![EntityKind::City, EntityKind::City]);
        assert_eq!(hits[0].id(), "Q1741");
    }

    #[test]
    fn test_locate_location_region_implies_country() {
        let ctx = ctx();
        let hits = ctx.locate_location(&["Illinois", "US"], false);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind(), EntityKind::Region);
    }

    #[test]
    fn test_locate_location_by_iso() {
        let ctx = ctx();
        let hits = ctx.locate_location(&["IL"], false);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "Illinois");
        assert!(ctx.locate_location(&["nowhere"], true).is_empty());
    }

    #[test]
    fn test_iso_looking_part_also_matches_names() {
        let countries = vec![Country {
            id: "Q16".into(),
            name: "Canada".into(),
            iso: Some("CA".into()),
            lat: None,
            lon: None,
            population: None,
        }];
        let regions = vec![Region {
            id: "Q99".into(),
            name: "CA".into(),
            iso: None,
            lat: None,
            lon: None,
            population: None,
            country_id: None,
        }];
        let ctx = LocationContext::new(countries, regions, Vec::new());
        let hits = ctx.locate_location(&["CA"], false);
        let ids: Vec<&str> = hits.iter().map(Location::id).collect();
        assert_eq!(ids, vec!["Q99", "Q16"]);
    }

    #[test]
    fn test_regions_of_country() {
        let ctx = ctx();
        let names: Vec<&str> = ctx
            .regions_of_country("Austria")
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Vienna"]);
    }

    #[test]
    fn test_nearest_cities() {
        let ctx = ctx();
        let hits = ctx.nearest(EntityKind::City, Point::new(48.2082, 16.3738), 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.id(), "Q577800");
    }
}
