// crates/geolocator-core/src/model/convert.rs
use super::raw::{CityRaw, CountryRaw, RegionRaw, Snapshot};
use super::{City, Country, Region};

/// **Standard Converter:** Raw -> Domain.
///
/// Rows are kept in source order, duplicates included; identifier
/// uniqueness is enforced later by the repositories.
pub fn from_snapshot(snapshot: Snapshot) -> (Vec<Country>, Vec<Region>, Vec<City>) {
    (
        snapshot.countries.into_iter().map(Country::from).collect(),
        snapshot.regions.into_iter().map(Region::from).collect(),
        snapshot.cities.into_iter().map(City::from).collect(),
    )
}

impl From<CountryRaw> for Country {
    fn from(raw: CountryRaw) -> Self {
        Country {
            id: raw.id,
            name: raw.name,
            iso: raw.iso,
            lat: raw.lat,
            lon: raw.lon,
            population: raw.population,
        }
    }
}

impl From<RegionRaw> for Region {
    fn from(raw: RegionRaw) -> Self {
        Region {
            id: raw.id,
            name: raw.name,
            iso: raw.iso,
            lat: raw.lat,
            lon: raw.lon,
            population: raw.population,
            country_id: raw.country_id,
        }
    }
}

impl From<CityRaw> for City {
    fn from(raw: CityRaw) -> Self {
        // The primary name is implied; keep labels to true alternates.
        let mut labels: Vec<String> = Vec::with_capacity(raw.labels.len());
        for label in raw.labels {
            if label != raw.name && !labels.contains(&label) {
                labels.push(label);
            }
        }
        City {
            id: raw.id,
            name: raw.name,
            labels,
            lat: raw.lat,
            lon: raw.lon,
            population: raw.population,
            region_id: raw.region_id,
            country_id: raw.country_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_labels_are_deduplicated() {
        let raw = CityRaw {
            id: "Q1726".into(),
            name: "Munich".into(),
            labels: vec!["München".into(), "Munich".into(), "München".into()],
            ..Default::default()
        };
        let city = City::from(raw);
        assert_eq!(city.labels, vec!["München".to_string()]);
    }

    #[test]
    fn test_from_snapshot_keeps_order_and_duplicates() {
        let snap = Snapshot {
            countries: vec![
                CountryRaw {
                    id: "Q40".into(),
                    name: "Austria".into(),
                    ..Default::default()
                },
                CountryRaw {
                    id: "Q40".into(),
                    name: "Austria (dup)".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let (countries, regions, cities) = from_snapshot(snap);
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[1].name, "Austria (dup)");
        assert!(regions.is_empty() && cities.is_empty());
    }
}
