// crates/geolocator-core/src/store/schema.rs
//! DDL for the reference cache.
//!
//! Base tables mirror the upstream snapshot. `entity_labels` holds every
//! searchable label (names, plus alternate city labels) with its folded key;
//! the three `*Lookup` tables are materialized joins over it and are rebuilt
//! from scratch on every populate.

pub(super) const DROP_ALL: &str = "
DROP TABLE IF EXISTS CityLookup;
DROP TABLE IF EXISTS RegionLookup;
DROP TABLE IF EXISTS CountryLookup;
DROP TABLE IF EXISTS entity_labels;
DROP TABLE IF EXISTS cities;
DROP TABLE IF EXISTS regions;
DROP TABLE IF EXISTS countries;
DROP TABLE IF EXISTS version;
";

pub(super) const CREATE_BASE: &str = "
CREATE TABLE countries (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    iso TEXT,
    population INTEGER,
    lat REAL,
    lon REAL
);
CREATE TABLE regions (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    iso TEXT,
    population INTEGER,
    lat REAL,
    lon REAL,
    countryId TEXT
);
CREATE TABLE cities (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    labels TEXT,
    population INTEGER,
    lat REAL,
    lon REAL,
    regionId TEXT,
    countryId TEXT
);
CREATE TABLE entity_labels (
    kind TEXT NOT NULL,
    entity INTEGER NOT NULL,
    label TEXT NOT NULL,
    labelKey TEXT NOT NULL,
    isName INTEGER NOT NULL
);
CREATE TABLE version (
    version TEXT NOT NULL
);
CREATE INDEX idx_countries_id ON countries(id);
CREATE INDEX idx_countries_name ON countries(name);
CREATE INDEX idx_countries_iso ON countries(iso);
CREATE INDEX idx_regions_id ON regions(id);
CREATE INDEX idx_regions_name ON regions(name);
CREATE INDEX idx_regions_iso ON regions(iso);
CREATE INDEX idx_cities_id ON cities(id);
CREATE INDEX idx_cities_name ON cities(name);
CREATE INDEX idx_labels_key ON entity_labels(kind, labelKey);
";

pub(super) const INSERT_COUNTRY: &str =
    "INSERT INTO countries (id, name, iso, population, lat, lon) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

pub(super) const INSERT_REGION: &str = "INSERT INTO regions (id, name, iso, population, lat, lon, countryId) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

pub(super) const INSERT_CITY: &str = "INSERT INTO cities (id, name, labels, population, lat, lon, regionId, countryId) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

pub(super) const INSERT_LABEL: &str =
    "INSERT INTO entity_labels (kind, entity, label, labelKey, isName) VALUES (?1, ?2, ?3, ?4, ?5)";

// Parents are joined on the first row carrying the identifier, matching the
// first-occurrence-wins rule of the in-memory linker.
pub(super) const CREATE_LOOKUPS: &str = "
CREATE TABLE CountryLookup AS
SELECT l.label AS label, l.labelKey AS labelKey,
       co.id AS id, co.name AS name, co.iso AS iso, co.population AS population,
       co.lat AS lat, co.lon AS lon
FROM entity_labels l
JOIN countries co ON l.kind = 'country' AND co.rowid = l.entity;

CREATE TABLE RegionLookup AS
SELECT l.label AS label, l.labelKey AS labelKey,
       r.id AS id, r.name AS name, r.iso AS iso, r.population AS population,
       r.lat AS lat, r.lon AS lon, r.countryId AS countryId,
       co.id AS countryRef, co.name AS countryName, co.iso AS countryIso,
       co.population AS countryPop, co.lat AS countryLat, co.lon AS countryLon
FROM entity_labels l
JOIN regions r ON l.kind = 'region' AND r.rowid = l.entity
LEFT JOIN countries co ON co.rowid = (SELECT MIN(rowid) FROM countries WHERE id = r.countryId);

CREATE TABLE CityLookup AS
SELECT l.label AS label, l.labelKey AS labelKey,
       ci.id AS id, ci.name AS name, ci.labels AS labels, ci.population AS population,
       ci.lat AS lat, ci.lon AS lon, ci.regionId AS regionId, ci.countryId AS countryId,
       r.id AS regionRef, r.name AS regionName, r.iso AS regionIso, r.population AS regionPop,
       r.lat AS regionLat, r.lon AS regionLon, r.countryId AS regionCountryId,
       co.id AS countryRef, co.name AS countryName, co.iso AS countryIso,
       co.population AS countryPop, co.lat AS countryLat, co.lon AS countryLon
FROM entity_labels l
JOIN cities ci ON l.kind = 'city' AND ci.rowid = l.entity
LEFT JOIN regions r ON r.rowid = (SELECT MIN(rowid) FROM regions WHERE id = ci.regionId)
LEFT JOIN countries co ON co.rowid = (SELECT MIN(rowid) FROM countries WHERE id = ci.countryId);

CREATE INDEX idx_countrylookup_label ON CountryLookup(label);
CREATE INDEX idx_countrylookup_key ON CountryLookup(labelKey);
CREATE INDEX idx_countrylookup_iso ON CountryLookup(iso);
CREATE INDEX idx_regionlookup_label ON RegionLookup(label);
CREATE INDEX idx_regionlookup_key ON RegionLookup(labelKey);
CREATE INDEX idx_regionlookup_iso ON RegionLookup(iso);
CREATE INDEX idx_citylookup_label ON CityLookup(label);
CREATE INDEX idx_citylookup_key ON CityLookup(labelKey);
";

// ---- SELECT LISTS (column order is what the row mappers expect) ----

pub(super) const COUNTRY_COLS: &str = "id, name, iso, population, lat, lon";

pub(super) const REGION_COLS: &str = "id, name, iso, population, lat, lon, countryId";

pub(super) const CITY_COLS: &str = "id, name, labels, population, lat, lon, regionId, countryId";

pub(super) const REGION_LOOKUP_COLS: &str = "id, name, iso, population, lat, lon, countryId, \
     countryRef, countryName, countryIso, countryPop, countryLat, countryLon";

pub(super) const CITY_LOOKUP_COLS: &str = "id, name, labels, population, lat, lon, regionId, countryId, \
     regionRef, regionName, regionIso, regionPop, regionLat, regionLon, regionCountryId, \
     countryRef, countryName, countryIso, countryPop, countryLat, countryLon";
