// crates/geolocator-core/src/store/mod.rs

//! # Reference Store
//!
//! Durable, versioned SQLite cache of the three collections.
//!
//! A cache is trusted only when every collection meets its minimum row count
//! **and** the single stored version stamp equals the configured one. A
//! populate writes everything inside one transaction, so a failed fetch or
//! insert leaves the previous cache untouched.

mod schema;

use crate::common::{DbStats, EntityKind};
use crate::config::{LocatorConfig, LookupMode, MinCounts};
use crate::error::{GeoError, Result};
use crate::loader::BackupSource;
use crate::model::raw::Snapshot;
use crate::model::{convert, City, CityContext, Country, Record, Region, RegionContext};
use crate::text::fold_key;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub struct ReferenceStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
    db_version: String,
    min_counts: MinCounts,
    lookup_mode: LookupMode,
}

impl std::fmt::Debug for ReferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceStore")
            .field("path", &self.path)
            .field("db_version", &self.db_version)
            .field("lookup_mode", &self.lookup_mode)
            .finish_non_exhaustive()
    }
}

impl ReferenceStore {
    /// Opens (or creates) the cache file at `config.db_path()`.
    pub fn open(config: &LocatorConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.cache_dir)?;
        let path = config.db_path();
        let conn = Connection::open(&path)?;
        debug!(path = %path.display(), "opened reference store");
        Ok(Self::with_connection(conn, Some(path), config))
    }

    /// A throwaway store, mostly for tests.
    pub fn open_in_memory(config: &LocatorConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::with_connection(conn, None, config))
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>, config: &LocatorConfig) -> Self {
        Self {
            conn: Mutex::new(conn),
            path,
            db_version: config.db_version.clone(),
            min_counts: config.min_counts,
            lookup_mode: config.lookup_mode,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lookup_mode(&self) -> LookupMode {
        self.lookup_mode
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GeoError::InvalidData("reference store lock poisoned".into()))
    }

    // -----------------------------------------------------------------------
    // CACHE VALIDITY
    // -----------------------------------------------------------------------

    /// `true` only if every collection holds more rows than its threshold
    /// and the version stamp matches.
    pub fn has_data(&self) -> Result<bool> {
        let conn = self.conn()?;
        for table in ["countries", "regions", "cities", "version", EntityKind::City.lookup_table()] {
            if !table_exists(&conn, table)? {
                debug!(table, "reference store incomplete");
                return Ok(false);
            }
        }
        let stats = stats_of(&conn)?;
        let versions: Vec<String> = query_rows(&conn, "SELECT version FROM version", [], |r| {
            r.get(0)
        })?;
        let version_ok = versions.len() == 1 && versions[0] == self.db_version;
        let counts_ok = stats.countries > self.min_counts.countries
            && stats.regions > self.min_counts.regions
            && stats.cities > self.min_counts.cities;
        if !version_ok {
            debug!(found = ?versions, expected = %self.db_version, "version stamp mismatch");
        }
        Ok(version_ok && counts_ok)
    }

    /// Row counts per collection; zero for missing tables.
    pub fn stats(&self) -> Result<DbStats> {
        let conn = self.conn()?;
        stats_of(&conn)
    }

    pub fn version(&self) -> Result<Option<String>> {
        let conn = self.conn()?;
        if !table_exists(&conn, "version")? {
            return Ok(None);
        }
        Ok(conn
            .query_row("SELECT version FROM version LIMIT 1", [], |r| r.get(0))
            .optional()?)
    }

    // -----------------------------------------------------------------------
    // POPULATE
    // -----------------------------------------------------------------------

    /// Refills the cache from `source` unless it is already valid.
    ///
    /// Returns `Ok(true)` when the cache was rewritten and `Ok(false)` when it
    /// was valid and `force` was not set. `force` is handed to the source so
    /// it goes back to upstream instead of a local copy. A source failure is reported as
    /// [`GeoError::DataUnavailable`] and leaves any existing cache in place.
    pub fn populate(&self, source: &dyn BackupSource, force: bool) -> Result<bool> {
        if !force && self.has_data()? {
            debug!("reference store already populated");
            return Ok(false);
        }
        info!(source = %source.describe(), force, "populating reference store");
        let snapshot = source.fetch(force).map_err(|e| match e {
            GeoError::DataUnavailable(_) => e,
            other => GeoError::unavailable(source.describe(), other),
        })?;
        if snapshot.is_empty() {
            return Err(GeoError::DataUnavailable(format!(
                "{} delivered an empty snapshot",
                source.describe()
            )));
        }
        let stats = self.write_snapshot(snapshot)?;
        info!(
            countries = stats.countries,
            regions = stats.regions,
            cities = stats.cities,
            duplicates = stats.duplicates,
            "reference store populated"
        );
        Ok(true)
    }

    /// Replaces all tables with the snapshot contents and stamps the version.
    pub fn write_snapshot(&self, snapshot: Snapshot) -> Result<DbStats> {
        let (countries, regions, cities) = convert::from_snapshot(snapshot);
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute_batch(schema::DROP_ALL)?;
        tx.execute_batch(schema::CREATE_BASE)?;
        {
            let mut label_stmt = tx.prepare(schema::INSERT_LABEL)?;

            let mut stmt = tx.prepare(schema::INSERT_COUNTRY)?;
            for c in &countries {
                let rowid = stmt.insert(params![
                    c.id,
                    c.name,
                    c.iso,
                    to_sql_pop(c.population),
                    c.lat,
                    c.lon
                ])?;
                label_stmt.execute(params!["country", rowid, c.name, fold_key(&c.name), 1])?;
            }

            let mut stmt = tx.prepare(schema::INSERT_REGION)?;
            for r in &regions {
                let rowid = stmt.insert(params![
                    r.id,
                    r.name,
                    r.iso,
                    to_sql_pop(r.population),
                    r.lat,
                    r.lon,
                    r.country_id
                ])?;
                label_stmt.execute(params!["region", rowid, r.name, fold_key(&r.name), 1])?;
            }

            let mut stmt = tx.prepare(schema::INSERT_CITY)?;
            for c in &cities {
                let labels = serde_json::to_string(&c.labels)?;
                let rowid = stmt.insert(params![
                    c.id,
                    c.name,
                    labels,
                    to_sql_pop(c.population),
                    c.lat,
                    c.lon,
                    c.region_id,
                    c.country_id
                ])?;
                label_stmt.execute(params!["city", rowid, c.name, fold_key(&c.name), 1])?;
                for alt in &c.labels {
                    label_stmt.execute(params!["city", rowid, alt, fold_key(alt), 0])?;
                }
            }
        }
        tx.execute_batch(schema::CREATE_LOOKUPS)?;
        tx.execute("INSERT INTO version (version) VALUES (?1)", params![self.db_version])?;
        let stats = stats_of(&tx)?;
        tx.commit()?;
        if stats.duplicates > 0 {
            warn!(duplicates = stats.duplicates, "reference data contains duplicate identifiers");
        }
        Ok(stats)
    }

    // -----------------------------------------------------------------------
    // IDENTIFIER QUERIES
    // -----------------------------------------------------------------------

    /// Identifiers of `kind` rows whose name equals `name`.
    ///
    /// Exact mode compares bytes; folded mode compares [`fold_key`] forms.
    /// Duplicate identifiers are returned as stored.
    pub fn get_by_name(&self, kind: EntityKind, name: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        match self.lookup_mode {
            LookupMode::Exact => {
                let sql = format!("SELECT id FROM {} WHERE name = ?1 ORDER BY rowid", kind.table());
                query_rows(&conn, &sql, params![name], |r| r.get(0))
            }
            LookupMode::Folded => {
                let sql = format!(
                    "SELECT t.id FROM entity_labels l JOIN {} t ON t.rowid = l.entity \
                     WHERE l.kind = ?1 AND l.isName = 1 AND l.labelKey = ?2 ORDER BY t.rowid",
                    kind.table()
                );
                query_rows(&conn, &sql, params![kind.as_str(), fold_key(name)], |r| r.get(0))
            }
        }
    }

    /// Identifiers matching an ISO code.
    ///
    /// Regions accept the bare subdivision code (`CA`) as well as the
    /// composite form (`US-CA`). Countries need an exact code. Cities carry
    /// no code and always yield nothing.
    pub fn get_by_iso_code(&self, kind: EntityKind, code: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        match kind {
            EntityKind::Country => query_rows(
                &conn,
                "SELECT id FROM countries WHERE iso = ?1 ORDER BY rowid",
                params![code],
                |r| r.get(0),
            ),
            EntityKind::Region => query_rows(
                &conn,
                "SELECT id FROM regions WHERE iso = ?1 OR iso LIKE '%-' || ?1 ORDER BY rowid",
                params![code],
                |r| r.get(0),
            ),
            EntityKind::City => Ok(Vec::new()),
        }
    }

    /// First row of `kind` carrying identifier `id`.
    pub fn get_by_id(&self, kind: EntityKind, id: &str) -> Result<Option<Record>> {
        let conn = self.conn()?;
        let record = match kind {
            EntityKind::Country => {
                let sql = format!("SELECT {} FROM countries WHERE id = ?1 ORDER BY rowid LIMIT 1", schema::COUNTRY_COLS);
                conn.query_row(&sql, params![id], |r| country_at(r, 0))
                    .optional()?
                    .map(Record::Country)
            }
            EntityKind::Region => {
                let sql = format!("SELECT {} FROM regions WHERE id = ?1 ORDER BY rowid LIMIT 1", schema::REGION_COLS);
                conn.query_row(&sql, params![id], |r| region_at(r, 0))
                    .optional()?
                    .map(Record::Region)
            }
            EntityKind::City => {
                let sql = format!("SELECT {} FROM cities WHERE id = ?1 ORDER BY rowid LIMIT 1", schema::CITY_COLS);
                conn.query_row(&sql, params![id], city_at)
                    .optional()?
                    .map(Record::City)
            }
        };
        Ok(record)
    }

    // -----------------------------------------------------------------------
    // LOOKUP VIEW QUERIES
    // -----------------------------------------------------------------------

    fn label_filter(&self, label: &str) -> (&'static str, String) {
        match self.lookup_mode {
            LookupMode::Exact => ("label", label.to_string()),
            LookupMode::Folded => ("labelKey", fold_key(label)),
        }
    }

    pub fn countries_for_label(&self, label: &str) -> Result<Vec<Country>> {
        let (column, value) = self.label_filter(label);
        let sql = format!(
            "SELECT {} FROM CountryLookup WHERE {column} = ?1 ORDER BY rowid",
            schema::COUNTRY_COLS
        );
        let conn = self.conn()?;
        query_rows(&conn, &sql, params![value], |r| country_at(r, 0))
    }

    pub fn countries_for_iso(&self, code: &str) -> Result<Vec<Country>> {
        let sql = format!(
            "SELECT {} FROM CountryLookup WHERE iso = ?1 ORDER BY rowid",
            schema::COUNTRY_COLS
        );
        let conn = self.conn()?;
        query_rows(&conn, &sql, params![code], |r| country_at(r, 0))
    }

    pub fn regions_for_label(&self, label: &str) -> Result<Vec<RegionContext>> {
        let (column, value) = self.label_filter(label);
        let sql = format!(
            "SELECT {} FROM RegionLookup WHERE {column} = ?1 ORDER BY rowid",
            schema::REGION_LOOKUP_COLS
        );
        let conn = self.conn()?;
        query_rows(&conn, &sql, params![value], region_context_at)
    }

    /// Regions by bare or composite ISO code (see [`Self::get_by_iso_code`]).
    pub fn regions_for_iso(&self, code: &str) -> Result<Vec<RegionContext>> {
        let sql = format!(
            "SELECT {} FROM RegionLookup WHERE iso = ?1 OR iso LIKE '%-' || ?1 ORDER BY rowid",
            schema::REGION_LOOKUP_COLS
        );
        let conn = self.conn()?;
        query_rows(&conn, &sql, params![code], region_context_at)
    }

    /// Cities whose name or alternate label equals `label`, with parents.
    pub fn cities_for_label(&self, label: &str) -> Result<Vec<CityContext>> {
        let (column, value) = self.label_filter(label);
        let sql = format!(
            "SELECT {} FROM CityLookup WHERE {column} = ?1 ORDER BY rowid",
            schema::CITY_LOOKUP_COLS
        );
        let conn = self.conn()?;
        let mut hits = query_rows(&conn, &sql, params![value], city_context_at)?;
        // A folded key can hit both the name and a label of the same row.
        let mut seen = std::collections::HashSet::new();
        hits.retain(|c| seen.insert((c.city.id.clone(), c.city.name.clone(), c.city.region_id.clone())));
        Ok(hits)
    }

    /// Regions whose country has the given name.
    pub fn regions_of_country(&self, country_name: &str) -> Result<Vec<Region>> {
        let sql = "SELECT r.id, r.name, r.iso, r.population, r.lat, r.lon, r.countryId \
                   FROM regions r JOIN countries c ON r.countryId = c.id \
                   WHERE c.name = ?1 ORDER BY r.rowid";
        let conn = self.conn()?;
        query_rows(&conn, sql, params![country_name], |r| region_at(r, 0))
    }

    // -----------------------------------------------------------------------
    // BULK LOAD
    // -----------------------------------------------------------------------

    pub fn load_countries(&self) -> Result<Vec<Country>> {
        let sql = format!("SELECT {} FROM countries ORDER BY rowid", schema::COUNTRY_COLS);
        let conn = self.conn()?;
        query_rows(&conn, &sql, [], |r| country_at(r, 0))
    }

    pub fn load_regions(&self) -> Result<Vec<Region>> {
        let sql = format!("SELECT {} FROM regions ORDER BY rowid", schema::REGION_COLS);
        let conn = self.conn()?;
        query_rows(&conn, &sql, [], |r| region_at(r, 0))
    }

    pub fn load_cities(&self) -> Result<Vec<City>> {
        let sql = format!("SELECT {} FROM cities ORDER BY rowid", schema::CITY_COLS);
        let conn = self.conn()?;
        query_rows(&conn, &sql, [], city_at)
    }
}

// ---- HELPERS ----

fn query_rows<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params, f)?;
    Ok(rows.collect::<rusqlite::Result<Vec<T>>>()?)
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}

fn stats_of(conn: &Connection) -> Result<DbStats> {
    let mut stats = DbStats::default();
    for kind in EntityKind::ALL {
        if !table_exists(conn, kind.table())? {
            continue;
        }
        let sql = format!("SELECT COUNT(*), COUNT(DISTINCT id) FROM {}", kind.table());
        let (total, distinct): (i64, i64) = conn.query_row(&sql, [], |r| Ok((r.get(0)?, r.get(1)?)))?;
        let total = total as usize;
        match kind {
            EntityKind::Country => stats.countries = total,
            EntityKind::Region => stats.regions = total,
            EntityKind::City => stats.cities = total,
        }
        stats.duplicates += total - distinct as usize;
    }
    Ok(stats)
}

fn to_sql_pop(p: Option<u64>) -> Option<i64> {
    p.and_then(|p| i64::try_from(p).ok())
}

fn pop_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<u64>> {
    let p: Option<i64> = row.get(idx)?;
    Ok(p.and_then(|p| u64::try_from(p).ok()))
}

// ---- ROW MAPPING ----

/// `id, name, iso, population, lat, lon` starting at `base`.
fn country_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Country> {
    Ok(Country {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        iso: row.get(base + 2)?,
        population: pop_at(row, base + 3)?,
        lat: row.get(base + 4)?,
        lon: row.get(base + 5)?,
    })
}

/// [`country_at`] plus `countryId`.
fn region_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Region> {
    Ok(Region {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        iso: row.get(base + 2)?,
        population: pop_at(row, base + 3)?,
        lat: row.get(base + 4)?,
        lon: row.get(base + 5)?,
        country_id: row.get(base + 6)?,
    })
}

fn city_at(row: &Row<'_>) -> rusqlite::Result<City> {
    let labels: Option<String> = row.get(2)?;
    Ok(City {
        id: row.get(0)?,
        name: row.get(1)?,
        labels: labels
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        population: pop_at(row, 3)?,
        lat: row.get(4)?,
        lon: row.get(5)?,
        region_id: row.get(6)?,
        country_id: row.get(7)?,
    })
}

/// Joined parent columns are all NULL when the foreign key did not resolve.
fn joined_country_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Option<Country>> {
    let id: Option<String> = row.get(base)?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(Country {
        id,
        name: row.get::<_, Option<String>>(base + 1)?.unwrap_or_default(),
        iso: row.get(base + 2)?,
        population: pop_at(row, base + 3)?,
        lat: row.get(base + 4)?,
        lon: row.get(base + 5)?,
    }))
}

fn region_context_at(row: &Row<'_>) -> rusqlite::Result<RegionContext> {
    Ok(RegionContext {
        region: region_at(row, 0)?,
        country: joined_country_at(row, 7)?,
    })
}

fn city_context_at(row: &Row<'_>) -> rusqlite::Result<CityContext> {
    let city = city_at(row)?;
    let region_ref: Option<String> = row.get(8)?;
    let region = match region_ref {
        Some(id) => Some(Region {
            id,
            name: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
            iso: row.get(10)?,
            population: pop_at(row, 11)?,
            lat: row.get(12)?,
            lon: row.get(13)?,
            country_id: row.get(14)?,
        }),
        None => None,
    };
    Ok(CityContext {
        city,
        region,
        country: joined_country_at(row, 15)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::raw::{CityRaw, CountryRaw, RegionRaw};

    fn snapshot() -> Snapshot {
        Snapshot {
            countries: vec![
                CountryRaw {
                    id: "Q30".into(),
                    name: "United States of America".into(),
                    iso: Some("US".into()),
                    ..Default::default()
                },
                CountryRaw {
                    id: "Q16".into(),
                    name: "Canada".into(),
                    iso: Some("CA".into()),
                    ..Default::default()
                },
            ],
            regions: vec![
                RegionRaw {
                    id: "Q99".into(),
                    name: "California".into(),
                    iso: Some("US-CA".into()),
                    country_id: Some("Q30".into()),
                    ..Default::default()
                },
                RegionRaw {
                    id: "Q1904".into(),
                    name: "Ontario".into(),
                    iso: Some("CA-ON".into()),
                    country_id: Some("Q16".into()),
                    ..Default::default()
                },
            ],
            cities: vec![
                CityRaw {
                    id: "Q65".into(),
                    name: "Los Angeles".into(),
                    labels: vec!["LA".into()],
                    lat: Some(34.05223),
                    lon: Some(-118.24368),
                    population: Some(3_976_322),
                    region_id: Some("Q99".into()),
                    country_id: Some("Q30".into()),
                },
                CityRaw {
                    id: "Q172".into(),
                    name: "Toronto".into(),
                    region_id: Some("Q1904".into()),
                    country_id: Some("Q16".into()),
                    ..Default::default()
                },
                CityRaw {
                    id: "Q172".into(),
                    name: "Toronto".into(),
                    region_id: Some("Q404".into()),
                    ..Default::default()
                },
            ],
        }
    }

    fn store(min: usize) -> ReferenceStore {
        let cfg = LocatorConfig::default().with_min_counts(min, min, min);
        ReferenceStore::open_in_memory(&cfg).unwrap()
    }

    #[test]
    fn test_empty_store_has_no_data() {
        let s = store(1);
        assert!(!s.has_data().unwrap());
        assert_eq!(s.stats().unwrap(), DbStats::default());
        assert_eq!(s.version().unwrap(), None);
    }

    #[test]
    fn test_write_snapshot_and_thresholds() {
        let s = store(1);
        let stats = s.write_snapshot(snapshot()).unwrap();
        assert_eq!(stats.cities, 3);
        assert_eq!(stats.duplicates, 1);
        assert!(s.has_data().unwrap());
        assert_eq!(s.version().unwrap().as_deref(), Some(crate::config::DB_VERSION));

        // Three cities against a threshold of three is not enough.
        let strict = ReferenceStore {
            min_counts: MinCounts {
                countries: 1,
                regions: 1,
                cities: 3,
            },
            ..s
        };
        assert!(!strict.has_data().unwrap());
    }

    #[test]
    fn test_version_mismatch_invalidates() {
        let s = store(1);
        s.write_snapshot(snapshot()).unwrap();
        let bumped = ReferenceStore {
            db_version: "2099-01-01".into(),
            ..s
        };
        assert!(!bumped.has_data().unwrap());
    }

    #[test]
    fn test_get_by_name_is_case_sensitive() {
        let s = store(1);
        s.write_snapshot(snapshot()).unwrap();
        assert_eq!(s.get_by_name(EntityKind::City, "Toronto").unwrap(), vec!["Q172", "Q172"]);
        assert!(s.get_by_name(EntityKind::City, "toronto").unwrap().is_empty());
        // Labels are not names.
        assert!(s.get_by_name(EntityKind::City, "LA").unwrap().is_empty());
    }

    #[test]
    fn test_get_by_name_folded() {
        let cfg = LocatorConfig::default().with_lookup_mode(LookupMode::Folded);
        let s = ReferenceStore::open_in_memory(&cfg).unwrap();
        s.write_snapshot(snapshot()).unwrap();
        assert_eq!(s.get_by_name(EntityKind::Region, "CALIFORNIA").unwrap(), vec!["Q99"]);
    }

    #[test]
    fn test_get_by_iso_code() {
        let s = store(1);
        s.write_snapshot(snapshot()).unwrap();
        assert_eq!(s.get_by_iso_code(EntityKind::Region, "CA").unwrap(), vec!["Q99"]);
        assert_eq!(s.get_by_iso_code(EntityKind::Region, "US-CA").unwrap(), vec!["Q99"]);
        assert_eq!(s.get_by_iso_code(EntityKind::Country, "CA").unwrap(), vec!["Q16"]);
        assert!(s.get_by_iso_code(EntityKind::Country, "US-CA").unwrap().is_empty());
        assert!(s.get_by_iso_code(EntityKind::City, "CA").unwrap().is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let s = store(1);
        s.write_snapshot(snapshot()).unwrap();
        match s.get_by_id(EntityKind::City, "Q65").unwrap() {
            Some(Record::City(c)) => {
                assert_eq!(c.name, "Los Angeles");
                assert_eq!(c.labels, vec!["LA"]);
                assert_eq!(c.population, Some(3_976_322));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(s.get_by_id(EntityKind::Country, "Q1").unwrap().is_none());
    }

    #[test]
    fn test_city_lookup_joins_parents_and_labels() {
        let s = store(1);
        s.write_snapshot(snapshot()).unwrap();

        let la = s.cities_for_label("LA").unwrap();
        assert_eq!(la.len(), 1);
        assert_eq!(la[0].region_iso(), Some("US-CA"));
        assert_eq!(la[0].country_iso(), Some("US"));

        let toronto = s.cities_for_label("Toronto").unwrap();
        assert_eq!(toronto.len(), 2);
        assert_eq!(toronto[0].region_name(), Some("Ontario"));
        // Second row points at an unknown region and no country.
        assert!(toronto[1].region.is_none());
        assert!(toronto[1].country.is_none());
    }

    #[test]
    fn test_region_queries() {
        let s = store(1);
        s.write_snapshot(snapshot()).unwrap();
        let by_iso = s.regions_for_iso("ON").unwrap();
        assert_eq!(by_iso.len(), 1);
        assert_eq!(by_iso[0].country_iso(), Some("CA"));

        let names: Vec<String> = s
            .regions_of_country("United States of America")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["California"]);
    }

    #[test]
    fn test_rewrite_replaces_previous_contents() {
        let s = store(1);
        s.write_snapshot(snapshot()).unwrap();
        let mut smaller = snapshot();
        smaller.cities.truncate(1);
        s.write_snapshot(smaller).unwrap();
        assert_eq!(s.stats().unwrap().cities, 1);
        assert!(s.cities_for_label("Toronto").unwrap().is_empty());
    }
}
