// crates/geolocator-core/src/model/raw.rs
//! Upstream snapshot records, exactly as the backup source delivers them.
//!
//! The backup files were produced by several generations of exporters, so
//! field names vary (`wikidataid` vs `id`, `pop` vs `population`) and numbers
//! sometimes arrive as strings. Everything here is lenient; the conversion to
//! domain types lives in [`convert`](super::convert).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The full list-of-records payload for all three kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub countries: Vec<CountryRaw>,
    #[serde(default)]
    pub regions: Vec<RegionRaw>,
    #[serde(default)]
    pub cities: Vec<CityRaw>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.regions.is_empty() && self.cities.is_empty()
    }

    /// Appends the records of `other`, keeping order.
    pub fn merge(&mut self, other: Snapshot) {
        self.countries.extend(other.countries);
        self.regions.extend(other.regions);
        self.cities.extend(other.cities);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryRaw {
    #[serde(alias = "wikidataid")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "isoCode", deserialize_with = "de_opt_string")]
    pub iso: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub lon: Option<f64>,
    #[serde(default, alias = "pop", deserialize_with = "de_opt_u64")]
    pub population: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionRaw {
    #[serde(alias = "wikidataid")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "isoCode", deserialize_with = "de_opt_string")]
    pub iso: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub lon: Option<f64>,
    #[serde(default, alias = "pop", deserialize_with = "de_opt_u64")]
    pub population: Option<u64>,
    #[serde(
        default,
        rename = "countryId",
        alias = "country_id",
        alias = "country_wikidataid",
        deserialize_with = "de_opt_string"
    )]
    pub country_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityRaw {
    #[serde(alias = "wikidataid")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "de_labels")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub lon: Option<f64>,
    #[serde(default, alias = "pop", deserialize_with = "de_opt_u64")]
    pub population: Option<u64>,
    #[serde(
        default,
        rename = "regionId",
        alias = "region_id",
        alias = "region_wikidataid",
        deserialize_with = "de_opt_string"
    )]
    pub region_id: Option<String>,
    #[serde(
        default,
        rename = "countryId",
        alias = "country_id",
        alias = "country_wikidataid",
        deserialize_with = "de_opt_string"
    )]
    pub country_id: Option<String>,
}

// ---- LENIENT FIELD PARSERS ----

fn de_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => crate::text::parse_opt_f64(Some(&s)),
        _ => None,
    })
}

fn de_opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => crate::text::parse_opt_f64(Some(&s))
            .filter(|f| *f >= 0.0)
            .map(|f| f.round() as u64),
        _ => None,
    })
}

fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Labels arrive as a JSON array or as a `|`-separated string.
fn de_labels<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let raw: Vec<String> = match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split('|').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_city_record() {
        let json = r#"{
            "wikidataid": "Q65",
            "name": "Los Angeles",
            "labels": "LA|City of Angels",
            "lat": "34.05223",
            "lon": -118.24368,
            "pop": "3976322",
            "regionId": "Q99",
            "countryId": "Q30"
        }"#;
        let city: CityRaw = serde_json::from_str(json).unwrap();
        assert_eq!(city.id, "Q65");
        assert_eq!(city.labels, vec!["LA", "City of Angels"]);
        assert_eq!(city.lat, Some(34.05223));
        assert_eq!(city.population, Some(3_976_322));
        assert_eq!(city.region_id.as_deref(), Some("Q99"));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let json = r#"{"id": "Q99", "name": "California", "isoCode": "US-CA", "pop": null, "countryId": ""}"#;
        let region: RegionRaw = serde_json::from_str(json).unwrap();
        assert_eq!(region.iso.as_deref(), Some("US-CA"));
        assert_eq!(region.population, None);
        assert_eq!(region.country_id, None);
        assert_eq!(region.lat, None);
    }

    #[test]
    fn test_wikidataid_foreign_keys() {
        let json = r#"{
            "name": "Los Angeles",
            "wikidataid": "Q65",
            "lat": 34.05223,
            "lon": -118.24368,
            "partOf": "US/CA",
            "level": 5,
            "locationKind": "City",
            "comment": null,
            "population": "3976322",
            "region_wikidataid": "Q99",
            "country_wikidataid": "Q30"
        }"#;
        let city: CityRaw = serde_json::from_str(json).unwrap();
        assert_eq!(city.region_id.as_deref(), Some("Q99"));
        assert_eq!(city.country_id.as_deref(), Some("Q30"));
        assert_eq!(city.population, Some(3_976_322));

        let json = r#"{"name": "California", "wikidataid": "Q99", "iso": "US-CA", "country_wikidataid": "Q30"}"#;
        let region: RegionRaw = serde_json::from_str(json).unwrap();
        assert_eq!(region.country_id.as_deref(), Some("Q30"));
    }

    #[test]
    fn test_snapshot_sections_are_optional() {
        let snap: Snapshot = serde_json::from_str(r#"{"countries": []}"#).unwrap();
        assert!(snap.is_empty());
    }
}
