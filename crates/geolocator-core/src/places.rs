// crates/geolocator-core/src/places.rs

//! # Place Context
//!
//! Classifies a bag of place names (typically pulled from free text) into
//! countries, regions, cities and everything else, and keeps how often each
//! was mentioned.
//!
//! Regions are only searched inside countries that were found, and match
//! fuzzily: a place counts as a region of a country when its Jaro-Winkler
//! similarity to one of that country's region names is at least
//! [`REGION_MATCH_THRESHOLD`].

use crate::error::Result;
use crate::locator::Locator;
use crate::text::strip_non_ascii;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub const REGION_MATCH_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Default)]
pub struct PlaceContext {
    /// Input names after alias normalization, in input order.
    pub places: Vec<String>,
    pub countries: Vec<String>,
    pub regions: Vec<String>,
    pub cities: Vec<String>,
    pub other: Vec<String>,
    /// `(name, count)`, most mentioned first.
    pub country_mentions: Vec<(String, usize)>,
    pub region_mentions: Vec<(String, usize)>,
    pub city_mentions: Vec<(String, usize)>,
    /// Country name → places matched as its regions.
    pub country_regions: HashMap<String, Vec<String>>,
    /// Country name → city names found in it.
    pub country_cities: HashMap<String, Vec<String>>,
    /// `"city, region, country"` for cities whose region was also mentioned.
    pub address_strings: Vec<String>,
}

impl PlaceContext {
    /// Normalizes `place_names`; nothing is classified yet.
    pub fn new<S: AsRef<str>>(locator: &Locator, place_names: &[S]) -> Self {
        let places = place_names
            .iter()
            .map(|p| locator.normalize(p.as_ref()).to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            places,
            ..Self::default()
        }
    }

    /// Normalizes and fully classifies `place_names`.
    pub fn classify<S: AsRef<str>>(locator: &Locator, place_names: &[S]) -> Result<Self> {
        let mut ctx = Self::new(locator, place_names);
        ctx.set_all(locator)?;
        Ok(ctx)
    }

    pub fn set_all(&mut self, locator: &Locator) -> Result<()> {
        self.set_countries(locator)?;
        self.set_regions(locator)?;
        self.set_cities(locator)?;
        self.set_other(locator);
        Ok(())
    }

    pub fn set_countries(&mut self, locator: &Locator) -> Result<()> {
        let mut found = Vec::new();
        for place in &self.places {
            if let Some(country) = locator.get_country(place)? {
                found.push(country.name);
            }
        }
        self.country_mentions = most_common(&found);
        self.countries = unique(found);
        Ok(())
    }

    pub fn set_regions(&mut self, locator: &Locator) -> Result<()> {
        if self.countries.is_empty() {
            self.set_countries(locator)?;
        }
        let distinct = unique(self.places.clone());
        let mut found = Vec::new();
        self.country_regions.clear();

        for country in &self.countries {
            let names: Vec<String> = locator
                .regions_of_country(country)?
                .into_iter()
                .map(|r| r.name)
                .collect();
            let matched: Vec<String> = distinct
                .iter()
                .filter(|place| names.iter().any(|name| region_match(place, name)))
                .cloned()
                .collect();
            found.extend(matched.iter().cloned());
            self.country_regions.insert(country.clone(), matched);
        }

        self.region_mentions = most_common(&found);
        self.regions = unique(found);
        Ok(())
    }

    pub fn set_cities(&mut self, locator: &Locator) -> Result<()> {
        if self.countries.is_empty() {
            self.set_countries(locator)?;
        }
        if self.regions.is_empty() {
            self.set_regions(locator)?;
        }
        self.cities.clear();
        self.country_cities.clear();
        self.address_strings.clear();

        let mut candidates = Vec::new();
        for place in unique(self.places.clone()) {
            candidates.extend(locator.cities_for_name(&place)?);
        }
        candidates.sort_by(|a, b| b.city.population.unwrap_or(0).cmp(&a.city.population.unwrap_or(0)));

        for hit in &candidates {
            let name = hit.city.name.clone();
            if !self.cities.contains(&name) {
                self.cities.push(name.clone());
            }
            let Some(country) = hit.country.as_ref().map(|c| c.name.clone()) else {
                continue;
            };
            if !self.countries.contains(&country) {
                self.countries.push(country.clone());
                self.country_mentions.push((country.clone(), 1));
            }
            let in_country = self.country_cities.entry(country.clone()).or_default();
            if in_country.contains(&name) {
                continue;
            }
            in_country.push(name.clone());
            if let Some(region) = hit.region_name() {
                let mentioned = self
                    .country_regions
                    .get(&country)
                    .is_some_and(|rs| rs.iter().any(|r| r == region));
                if mentioned {
                    self.address_strings.push(format!("{name}, {region}, {country}"));
                }
            }
        }

        let mentioned: Vec<String> = self
            .places
            .iter()
            .filter(|p| self.cities.contains(p))
            .cloned()
            .collect();
        self.city_mentions = most_common(&mentioned);
        debug!(
            cities = self.cities.len(),
            addresses = self.address_strings.len(),
            "classified cities"
        );
        Ok(())
    }

    /// Places that are none of country, region or city.
    pub fn set_other(&mut self, locator: &Locator) {
        let known = |place: &str| {
            let corrected = locator.correct_country_misspelling(place);
            [&self.countries, &self.regions, &self.cities]
                .iter()
                .any(|list| list.iter().any(|k| k == corrected))
        };
        self.other = self
            .places
            .iter()
            .filter(|p| !known(p))
            .cloned()
            .collect();
    }
}

impl std::fmt::Display for PlaceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "countries={:?}", self.countries)?;
        writeln!(f, "regions={:?}", self.regions)?;
        writeln!(f, "cities={:?}", self.cities)?;
        write!(f, "other={:?}", self.other)
    }
}

/// Fuzzy comparison of a place against a known region name.
pub fn region_match(place: &str, region: &str) -> bool {
    let a = strip_non_ascii(place).to_lowercase();
    let b = strip_non_ascii(region).to_lowercase();
    strsim::jaro_winkler(&a, &b) >= REGION_MATCH_THRESHOLD
}

fn unique(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

/// Counts per item, highest first; ties keep first-seen order.
fn most_common(items: &[String]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(k, _)| k == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
