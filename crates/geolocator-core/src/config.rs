// crates/geolocator-core/src/config.rs

//! # Locator Configuration
//!
//! Everything that changes how the locator finds, validates and queries its
//! reference data. Defaults target the full upstream gazetteer; tests shrink
//! the row-count thresholds to fit small fixtures.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

// -----------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------

/// Version stamp written into the cache. Bumping it forces a repopulate.
pub const DB_VERSION: &str = "2021-08-13 14:49:00";

pub const DEFAULT_DB_FILENAME: &str = "locations.db";

pub const DEFAULT_CACHE_DIRNAME: &str = ".geolocator";

/// Directory holding the per-kind backup files.
pub const DEFAULT_BACKUP_URL: &str =
    "https://raw.githubusercontent.com/wiki/somnathrakshit/geograpy3/data";

/// List names of the per-kind backups; each file is `{name}_geograpy3.json.gz`
/// and holds a single `{name: [...]}` list.
pub const BACKUP_LISTS: [&str; 3] = ["countries", "regions", "cities"];

// -----------------------------------------------------------------------------
// CONFIGURATION
// -----------------------------------------------------------------------------

/// How name lookups compare labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// Byte-exact, case-sensitive match.
    #[default]
    Exact,
    /// Accent- and case-insensitive match on the folded key.
    Folded,
}

/// Minimum row counts a cache must hold before it is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinCounts {
    pub countries: usize,
    pub regions: usize,
    pub cities: usize,
}

impl Default for MinCounts {
    fn default() -> Self {
        Self {
            countries: 200,
            regions: 3000,
            cities: 200_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub cache_dir: PathBuf,
    pub db_filename: String,
    pub db_version: String,
    /// Either a directory URL holding the per-kind backups or the URL of a
    /// single combined `.json` / `.json.gz` snapshot.
    pub backup_url: String,
    pub min_counts: MinCounts,
    pub correct_misspelling: bool,
    pub lookup_mode: LookupMode,
    /// Fall back to the most populous candidate when no country or region
    /// evidence decides.
    pub by_population: bool,
    pub http_timeout: Duration,
    /// Overrides for the embedded alias resources.
    pub aliases_path: Option<PathBuf>,
    pub misspellings_path: Option<PathBuf>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            db_filename: DEFAULT_DB_FILENAME.to_string(),
            db_version: DB_VERSION.to_string(),
            backup_url: DEFAULT_BACKUP_URL.to_string(),
            min_counts: MinCounts::default(),
            correct_misspelling: false,
            lookup_mode: LookupMode::Exact,
            by_population: true,
            http_timeout: Duration::from_secs(60),
            aliases_path: None,
            misspellings_path: None,
        }
    }
}

impl LocatorConfig {
    /// Defaults, overridden by `GEOLOCATOR_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(dir) = env::var("GEOLOCATOR_CACHE_DIR") {
            if !dir.trim().is_empty() {
                cfg.cache_dir = PathBuf::from(dir);
            }
        }
        if let Ok(url) = env::var("GEOLOCATOR_BACKUP_URL") {
            if !url.trim().is_empty() {
                cfg.backup_url = url;
            }
        }
        if let Ok(flag) = env::var("GEOLOCATOR_CORRECT_MISSPELLING") {
            cfg.correct_misspelling = matches!(flag.trim(), "1" | "true" | "yes" | "on");
        }
        cfg
    }

    pub fn db_path(&self) -> PathBuf {
        self.cache_dir.join(&self.db_filename)
    }

    /// The backup files to download, as `(url, local path)` pairs.
    pub fn backup_files(&self) -> Vec<(String, PathBuf)> {
        let url = self.backup_url.trim_end_matches('/');
        let urls: Vec<String> = if is_snapshot_file(url) {
            vec![url.to_string()]
        } else {
            BACKUP_LISTS
                .iter()
                .map(|list| format!("{url}/{list}_geograpy3.json.gz"))
                .collect()
        };
        urls.into_iter()
            .map(|u| {
                let name = u.rsplit('/').next().unwrap_or_default().to_string();
                let path = self.cache_dir.join(name);
                (u, path)
            })
            .collect()
    }

    /// Local paths the downloaded backups are written to.
    pub fn backup_paths(&self) -> Vec<PathBuf> {
        self.backup_files().into_iter().map(|(_, p)| p).collect()
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_backup_url(mut self, url: impl Into<String>) -> Self {
        self.backup_url = url.into();
        self
    }

    pub fn with_min_counts(mut self, countries: usize, regions: usize, cities: usize) -> Self {
        self.min_counts = MinCounts {
            countries,
            regions,
            cities,
        };
        self
    }

    pub fn with_correct_misspelling(mut self, on: bool) -> Self {
        self.correct_misspelling = on;
        self
    }

    pub fn with_lookup_mode(mut self, mode: LookupMode) -> Self {
        self.lookup_mode = mode;
        self
    }

    pub fn with_by_population(mut self, on: bool) -> Self {
        self.by_population = on;
        self
    }
}

fn is_snapshot_file(url: &str) -> bool {
    url.ends_with(".json") || url.ends_with(".json.gz")
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(env::temp_dir)
        .join(DEFAULT_CACHE_DIRNAME)
}
