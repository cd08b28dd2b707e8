// crates/geolocator-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the Physical Layer (I/O, Decompression, Download) and hands a
//! parsed [`Snapshot`] to the reference store. The store only ever talks to
//! the [`BackupSource`] trait, so tests can feed it an in-memory snapshot.

use crate::error::{GeoError, Result};
use crate::model::raw::Snapshot;
use std::path::{Path, PathBuf};
use tracing::info;

pub mod common_io;

#[cfg(feature = "fetch")]
mod http;

#[cfg(feature = "fetch")]
pub use http::HttpSource;

pub use common_io::{needs_download, open_stream};

/// Something that can deliver the full upstream snapshot.
pub trait BackupSource: Send + Sync {
    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;

    /// Delivers the snapshot. `force` asks the source to bypass anything it
    /// cached locally and go back to upstream.
    fn fetch(&self, force: bool) -> Result<Snapshot>;
}

/// An in-memory snapshot is its own source.
impl BackupSource for Snapshot {
    fn describe(&self) -> String {
        format!(
            "in-memory snapshot ({} countries, {} regions, {} cities)",
            self.countries.len(),
            self.regions.len(),
            self.cities.len()
        )
    }

    fn fetch(&self, _force: bool) -> Result<Snapshot> {
        Ok(self.clone())
    }
}

/// One or more `.json` / `.json.gz` snapshot files on disk, merged in order.
///
/// Each file may hold any subset of the `countries`, `regions` and `cities`
/// lists, so the per-kind upstream backups load the same way as a combined
/// snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    paths: Vec<PathBuf>,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn read_one(path: &Path) -> Result<Snapshot> {
        let reader = open_stream(path).map_err(|e| GeoError::unavailable(path.display(), e))?;
        let snapshot: Snapshot =
            serde_json::from_reader(reader).map_err(|e| GeoError::unavailable(path.display(), e))?;
        info!(
            path = %path.display(),
            countries = snapshot.countries.len(),
            regions = snapshot.regions.len(),
            cities = snapshot.cities.len(),
            "read backup snapshot"
        );
        Ok(snapshot)
    }
}

impl BackupSource for JsonFileSource {
    fn describe(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn fetch(&self, _force: bool) -> Result<Snapshot> {
        let mut merged = Snapshot::default();
        for path in &self.paths {
            merged.merge(Self::read_one(path)?);
        }
        Ok(merged)
    }
}

/// Picks a source for a user-supplied location: URLs go over HTTP (when the
/// `fetch` feature is on), everything else is read from disk.
pub fn source_for(location: &str, config: &crate::config::LocatorConfig) -> Result<Box<dyn BackupSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        #[cfg(feature = "fetch")]
        {
            let cfg = config.clone().with_backup_url(location);
            return Ok(Box::new(HttpSource::from_config(&cfg)));
        }
        #[cfg(not(feature = "fetch"))]
        {
            let _ = config;
            return Err(GeoError::InvalidInput(format!(
                "cannot download {location}: the `fetch` feature is disabled"
            )));
        }
    }
    Ok(Box::new(JsonFileSource::new(location)))
}

/// The source a default-configured locator uses: the per-kind backup files.
///
/// Without the `fetch` feature those files are expected to have been placed
/// in the cache directory already.
pub fn default_source(config: &crate::config::LocatorConfig) -> Box<dyn BackupSource> {
    #[cfg(feature = "fetch")]
    {
        Box::new(HttpSource::from_config(config))
    }
    #[cfg(not(feature = "fetch"))]
    {
        Box::new(JsonFileSource::from_paths(config.backup_paths()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "countries": [{"id": "Q40", "name": "Austria", "iso": "AT"}],
        "regions": [],
        "cities": [{"id": "Q1741", "name": "Vienna", "countryId": "Q40", "pop": 1897491}]
    }"#;

    #[test]
    fn test_json_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let snap = JsonFileSource::new(&path).fetch(false).unwrap();
        assert_eq!(snap.countries.len(), 1);
        assert_eq!(snap.cities[0].population, Some(1_897_491));
    }

    #[cfg(feature = "compact")]
    #[test]
    fn test_gzip_file_source() {
        use flate2::{write::GzEncoder, Compression};
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json.gz");
        let mut enc = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        enc.write_all(SNAPSHOT.as_bytes()).unwrap();
        enc.finish().unwrap();

        let snap = JsonFileSource::new(&path).fetch(false).unwrap();
        assert_eq!(snap.cities[0].name, "Vienna");
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = JsonFileSource::new("/no/such/snapshot.json").fetch(false).unwrap_err();
        assert!(err.is_data_unavailable());
    }

    #[test]
    fn test_per_kind_files_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        let countries = dir.path().join("countries_geograpy3.json");
        let cities = dir.path().join("cities_geograpy3.json");
        std::fs::write(&countries, r#"{"countries": [{"wikidataid": "Q40", "name": "Austria"}]}"#).unwrap();
        std::fs::write(
            &cities,
            r#"{"cities": [{"wikidataid": "Q1741", "name": "Vienna", "country_wikidataid": "Q40"}]}"#,
        )
        .unwrap();

        let src = JsonFileSource::from_paths([&countries, &cities]);
        let snap = src.fetch(false).unwrap();
        assert_eq!(snap.countries.len(), 1);
        assert_eq!(snap.cities.len(), 1);
        assert_eq!(snap.cities[0].country_id.as_deref(), Some("Q40"));
    }

    #[test]
    fn test_source_for_path() {
        let cfg = crate::config::LocatorConfig::default();
        let src = source_for("/tmp/x.json", &cfg).unwrap();
        assert_eq!(src.describe(), "/tmp/x.json");
    }
}
