// crates/geolocator-core/src/disambiguate.rs

//! # Disambiguator
//!
//! Picks one city out of same-named candidates. Rules, first match wins:
//!
//! 1. a single candidate is taken as is;
//! 2. with a matched country, the first city in that country;
//! 3. with region candidates, the first city lying in one of them, unless
//!    the region merely shares the city's name (city-states like Vienna or
//!    Berlin carry no evidence that way);
//! 4. the most populous candidate, missing population counting as zero;
//! 5. otherwise nothing.
//!
//! Country and region evidence outrank population; population is only the
//! prior when nothing else decides.

use crate::model::{CityContext, Country, RegionContext};
use crate::traits::HasPopulation;

/// Applies the tie-break policy. Pure: equal inputs give equal output.
///
/// With `by_population` off, rule 4 is skipped and undecided input yields
/// `None`.
pub fn disambiguate<'a>(
    country: Option<&Country>,
    regions: &[RegionContext],
    cities: &'a [CityContext],
    by_population: bool,
) -> Option<&'a CityContext> {
    match cities {
        [] => return None,
        [only] => return Some(only),
        _ => {}
    }

    if let Some(iso) = country.and_then(Country::iso) {
        if let Some(hit) = cities.iter().find(|c| c.country_iso() == Some(iso)) {
            return Some(hit);
        }
    }

    for region in regions {
        let Some(iso) = region.iso() else {
            continue;
        };
        let hit = cities.iter().find(|c| {
            c.region_iso() == Some(iso) && c.region_name() != Some(c.city.name.as_str())
        });
        if hit.is_some() {
            return hit;
        }
    }

    if by_population {
        return most_populous(cities);
    }
    None
}

/// First candidate with the highest population.
fn most_populous(cities: &[CityContext]) -> Option<&CityContext> {
    cities.iter().fold(None, |best: Option<&CityContext>, c| match best {
        Some(b) if b.population_or_zero() >= c.population_or_zero() => Some(b),
        _ => Some(c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{City, Region};

    fn country(iso: &str) -> Country {
        Country {
            id: format!("C-{iso}"),
            name: iso.into(),
            iso: Some(iso.into()),
            lat: None,
            lon: None,
            population: None,
        }
    }

    fn region(name: &str, iso: &str) -> Region {
        Region {
            id: format!("R-{iso}"),
            name: name.into(),
            iso: Some(iso.into()),
            lat: None,
            lon: None,
            population: None,
            country_id: None,
        }
    }

    fn city(name: &str, pop: Option<u64>, region: Option<Region>, iso: Option<&str>) -> CityContext {
        CityContext {
            city: City {
                id: format!("{name}-{}", iso.unwrap_or("?")),
                name: name.into(),
                labels: Vec::new(),
                lat: None,
                lon: None,
                population: pop,
                region_id: region.as_ref().map(|r| r.id.clone()),
                country_id: None,
            },
            region,
            country: iso.map(country),
        }
    }

    fn rc(r: Region) -> RegionContext {
        RegionContext {
            region: r,
            country: None,
        }
    }

    #[test]
    fn test_no_candidates() {
        assert!(disambiguate(Some(&country("US")), &[], &[], true).is_none());
    }

    #[test]
    fn test_single_candidate_wins_regardless() {
        let cities = vec![city("Vienna", Some(1), None, Some("US"))];
        let hit = disambiguate(Some(&country("AT")), &[], &cities, false).unwrap();
        assert_eq!(hit.country_iso(), Some("US"));
    }

    #[test]
    fn test_country_beats_population() {
        let cities = vec![
            city("Paris", Some(2_000_000), None, Some("FR")),
            city("Paris", Some(25_000), None, Some("US")),
        ];
        let hit = disambiguate(Some(&country("US")), &[], &cities, true).unwrap();
        assert_eq!(hit.country_iso(), Some("US"));
    }

    #[test]
    fn test_population_fallback() {
        let cities = vec![
            city("X", Some(500_000), None, Some("FR")),
            city("X", Some(2_000_000), None, Some("US")),
        ];
        let hit = disambiguate(None, &[], &cities, true).unwrap();
        assert_eq!(hit.country_iso(), Some("US"));
        assert!(disambiguate(None, &[], &cities, false).is_none());
    }

    #[test]
    fn test_population_ties_and_missing() {
        let cities = vec![
            city("X", None, None, Some("AA")),
            city("X", Some(10), None, Some("BB")),
            city("X", Some(10), None, Some("CC")),
        ];
        let hit = disambiguate(None, &[], &cities, true).unwrap();
        assert_eq!(hit.country_iso(), Some("BB"));
    }

    #[test]
    fn test_region_evidence_skips_city_states() {
        let vienna_state = region("Vienna", "AT-9");
        let illinois = region("Illinois", "US-IL");
        let cities = vec![
            city("Vienna", Some(1_900_000), Some(vienna_state.clone()), Some("AT")),
            city("Vienna", Some(1_400), Some(illinois.clone()), Some("US")),
        ];
        let regions = vec![rc(vienna_state), rc(illinois)];
        let hit = disambiguate(None, &regions, &cities, true).unwrap();
        assert_eq!(hit.country_iso(), Some("US"));
    }

    #[test]
    fn test_unmatched_country_falls_through_to_regions() {
        let texas = region("Texas", "US-TX");
        let cities = vec![
            city("Paris", Some(2_000_000), Some(region("Île-de-France", "FR-IDF")), Some("FR")),
            city("Paris", Some(25_000), Some(texas.clone()), Some("US")),
        ];
        let hit = disambiguate(Some(&country("TX")), &[rc(texas)], &cities, true).unwrap();
        assert_eq!(hit.region_iso(), Some("US-TX"));
    }

    #[test]
    fn test_deterministic() {
        let cities = vec![
            city("X", Some(1), None, Some("FR")),
            city("X", Some(2), None, Some("US")),
        ];
        let a = disambiguate(None, &[], &cities, true);
        let b = disambiguate(None, &[], &cities, true);
        assert_eq!(a, b);
    }
}
