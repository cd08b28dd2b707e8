// crates/geolocator-core/src/locator.rs

//! # Locator
//!
//! The public entry point. Owns the reference store, the backup source and
//! the alias tables; turns raw tokens into disambiguated cities.
//!
//! Prefer constructing a [`Locator`] and passing it around. For callers that
//! want a process-wide instance, [`Locator::global`] lazily builds one behind
//! an initialize-once guard and [`Locator::reset_global`] drops it again.
//!
//! ```no_run
//! use geolocator_core::{Locator, LocatorConfig};
//!
//! let locator = Locator::new(LocatorConfig::from_env())?;
//! if let Some(city) = locator.locate_city(&["Vienna", "Illinois"])? {
//!     println!("{}", city.display_name());
//! }
//! # Ok::<(), geolocator_core::GeoError>(())
//! ```

use crate::alias::{AliasTable, MisspellingTable};
use crate::common::DbStats;
use crate::config::LocatorConfig;
use crate::context::LocationContext;
use crate::disambiguate::disambiguate;
use crate::error::{GeoError, Result};
use crate::loader::{default_source, BackupSource};
use crate::model::{CityContext, Country, Location, Region, RegionContext};
use crate::store::ReferenceStore;
use crate::text::is_iso_code;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, warn};

static GLOBAL: Lazy<Mutex<Option<Arc<Locator>>>> = Lazy::new(|| Mutex::new(None));

pub struct Locator {
    config: LocatorConfig,
    store: ReferenceStore,
    source: Box<dyn BackupSource>,
    aliases: AliasTable,
    misspellings: MisspellingTable,
    ready: AtomicBool,
    context: RwLock<Option<Arc<LocationContext>>>,
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("store", &self.store)
            .field("source", &self.source.describe())
            .field("aliases", &self.aliases.len())
            .finish_non_exhaustive()
    }
}

impl Locator {
    // -----------------------------------------------------------------------
    // CONSTRUCTION
    // -----------------------------------------------------------------------

    /// Opens the on-disk cache; data is fetched from the configured backup
    /// URL on first use.
    pub fn new(config: LocatorConfig) -> Result<Self> {
        let source = default_source(&config);
        Self::with_source(config, source)
    }

    pub fn with_source(config: LocatorConfig, source: Box<dyn BackupSource>) -> Result<Self> {
        let store = ReferenceStore::open(&config)?;
        Self::assemble(config, store, source)
    }

    /// Same as [`Locator::with_source`] but with a throwaway in-memory cache.
    pub fn in_memory(config: LocatorConfig, source: Box<dyn BackupSource>) -> Result<Self> {
        let store = ReferenceStore::open_in_memory(&config)?;
        Self::assemble(config, store, source)
    }

    fn assemble(
        config: LocatorConfig,
        store: ReferenceStore,
        source: Box<dyn BackupSource>,
    ) -> Result<Self> {
        let aliases = match &config.aliases_path {
            Some(path) => AliasTable::load_from_path(path)?,
            None => AliasTable::embedded()?,
        };
        let misspellings = match &config.misspellings_path {
            Some(path) => MisspellingTable::load_from_path(path)?,
            None => MisspellingTable::embedded()?,
        };
        Ok(Self {
            config,
            store,
            source,
            aliases,
            misspellings,
            ready: AtomicBool::new(false),
            context: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    // -----------------------------------------------------------------------
    // GLOBAL ACCESSOR
    // -----------------------------------------------------------------------

    /// The process-wide locator, configured from the environment on first use.
    pub fn global() -> Result<Arc<Locator>> {
        Self::init_global(LocatorConfig::from_env())
    }

    /// Builds the process-wide locator with `config` unless one exists; an
    /// existing instance is returned unchanged.
    pub fn init_global(config: LocatorConfig) -> Result<Arc<Locator>> {
        let mut slot = GLOBAL.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = slot.as_ref() {
            return Ok(Arc::clone(existing));
        }
        let locator = Arc::new(Locator::new(config)?);
        *slot = Some(Arc::clone(&locator));
        Ok(locator)
    }

    /// Installs an already built locator as the process-wide one.
    pub fn set_global(locator: Arc<Locator>) {
        let mut slot = GLOBAL.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(locator);
    }

    /// Drops the process-wide locator; the next [`Locator::global`] builds a
    /// fresh one.
    pub fn reset_global() {
        let mut slot = GLOBAL.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    // -----------------------------------------------------------------------
    // POPULATION
    // -----------------------------------------------------------------------

    pub fn has_data(&self) -> Result<bool> {
        self.store.has_data()
    }

    /// See [`ReferenceStore::populate`]. A rewrite drops the cached context.
    pub fn populate(&self, force: bool) -> Result<bool> {
        let rewritten = self.store.populate(self.source.as_ref(), force)?;
        if rewritten {
            self.invalidate_context();
        }
        self.ready.store(true, Ordering::Release);
        Ok(rewritten)
    }

    /// Forces a full repopulation; the backup source is asked to go back to
    /// upstream rather than reuse a local download.
    pub fn recreate_database(&self) -> Result<()> {
        self.populate(true).map(|_| ())
    }

    /// Populates on first use. A failed fetch still leaves an existing (stale)
    /// cache usable; only an empty cache is an error.
    fn ensure_populated(&self) -> Result<()> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }
        match self.populate(false) {
            Ok(_) => Ok(()),
            Err(e) if e.is_data_unavailable() && self.store.stats()?.cities > 0 => {
                warn!(error = %e, "backup unavailable; using stale cache");
                self.ready.store(true, Ordering::Release);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn stats(&self) -> Result<DbStats> {
        self.ensure_populated()?;
        self.store.stats()
    }

    // -----------------------------------------------------------------------
    // NORMALIZATION
    // -----------------------------------------------------------------------

    /// Trims the token and swaps it for its alias, if one exists.
    pub fn normalize<'a>(&'a self, token: &'a str) -> &'a str {
        self.aliases.resolve(token.trim())
    }

    /// Canonical name for a misspelled country, if the table knows it.
    pub fn correct_country_misspelling<'a>(&'a self, name: &'a str) -> &'a str {
        self.misspellings.correct(name).unwrap_or(name)
    }

    // -----------------------------------------------------------------------
    // CANDIDATE QUERIES
    // -----------------------------------------------------------------------

    fn country_candidates(&self, token: &str) -> Result<Vec<Country>> {
        if is_iso_code(token) {
            return self.store.countries_for_iso(token);
        }
        let name = if self.config.correct_misspelling {
            self.correct_country_misspelling(token)
        } else {
            token
        };
        self.store.countries_for_label(name)
    }

    fn region_candidates(&self, token: &str) -> Result<Vec<RegionContext>> {
        if is_iso_code(token) {
            self.store.regions_for_iso(token)
        } else {
            self.store.regions_for_label(token)
        }
    }

    /// The country `name` refers to: by code if it looks like an ISO code,
    /// otherwise by name (after misspelling correction, when enabled).
    pub fn get_country(&self, name: &str) -> Result<Option<Country>> {
        self.ensure_populated()?;
        let token = self.normalize(name);
        Ok(self.country_candidates(token)?.into_iter().next())
    }

    pub fn is_a_country(&self, name: &str) -> Result<bool> {
        Ok(self.get_country(name)?.is_some())
    }

    /// All cities named or labelled `name`, most populous first.
    pub fn cities_for_name(&self, name: &str) -> Result<Vec<CityContext>> {
        self.ensure_populated()?;
        let mut cities = self.store.cities_for_label(self.normalize(name))?;
        cities.sort_by(|a, b| b.city.population.unwrap_or(0).cmp(&a.city.population.unwrap_or(0)));
        Ok(cities)
    }

    /// Regions matching `name` by ISO code or by name.
    pub fn regions_for_name(&self, name: &str) -> Result<Vec<RegionContext>> {
        self.ensure_populated()?;
        self.region_candidates(self.normalize(name))
    }

    pub fn regions_of_country(&self, country_name: &str) -> Result<Vec<Region>> {
        self.ensure_populated()?;
        let name = if self.config.correct_misspelling {
            self.correct_country_misspelling(country_name)
        } else {
            country_name
        };
        self.store.regions_of_country(name)
    }

    // -----------------------------------------------------------------------
    // RESOLUTION
    // -----------------------------------------------------------------------

    /// Resolves tokens such as `["Vienna", "Austria"]` to a single city.
    ///
    /// `Ok(None)` means nothing matched. Errors are reserved for an empty
    /// token list ([`GeoError::InvalidInput`]) and for missing reference data
    /// ([`GeoError::DataUnavailable`]).
    pub fn locate_city<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Option<CityContext>> {
        if tokens.is_empty() {
            return Err(GeoError::InvalidInput("no location tokens given".into()));
        }
        self.ensure_populated()?;

        let mut country: Option<Country> = None;
        let mut regions: Vec<RegionContext> = Vec::new();
        let mut cities: Vec<CityContext> = Vec::new();

        for raw in tokens {
            let token = self.normalize(raw.as_ref());
            if token.is_empty() {
                continue;
            }
            // Last matching token wins.
            if let Some(c) = soft(self.country_candidates(token), token).into_iter().next() {
                country = Some(c);
            }
            cities.extend(soft(self.store.cities_for_label(token), token));
            regions.extend(soft(self.region_candidates(token), token));
        }

        debug!(
            country = ?country.as_ref().map(|c| c.name.as_str()),
            regions = regions.len(),
            cities = cities.len(),
            "city candidates"
        );
        Ok(disambiguate(country.as_ref(), &regions, &cities, self.config.by_population).cloned())
    }

    /// Comma-separated convenience form of [`Locator::locate_city`].
    pub fn locate_city_str(&self, text: &str) -> Result<Option<CityContext>> {
        let tokens: Vec<&str> = text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        self.locate_city(&tokens)
    }

    /// The in-memory linked gazetteer, loaded from the store on first use.
    pub fn context(&self) -> Result<Arc<LocationContext>> {
        if let Some(ctx) = self.read_context()? {
            return Ok(ctx);
        }
        self.ensure_populated()?;
        let mut slot = self
            .context
            .write()
            .map_err(|_| GeoError::InvalidData("location context lock poisoned".into()))?;
        if let Some(ctx) = slot.as_ref() {
            return Ok(Arc::clone(ctx));
        }
        let ctx = Arc::new(LocationContext::from_store(&self.store)?);
        *slot = Some(Arc::clone(&ctx));
        Ok(ctx)
    }

    /// Every city, region and country the tokens could refer to.
    pub fn locate_location<S: AsRef<str>>(&self, tokens: &[S], verbose: bool) -> Result<Vec<Location>> {
        Ok(self.context()?.locate_location(tokens, verbose))
    }

    fn read_context(&self) -> Result<Option<Arc<LocationContext>>> {
        let slot = self
            .context
            .read()
            .map_err(|_| GeoError::InvalidData("location context lock poisoned".into()))?;
        Ok(slot.as_ref().map(Arc::clone))
    }

    fn invalidate_context(&self) {
        let mut slot = self.context.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

/// Lookup failures never fail a resolution; they count as "no candidates".
fn soft<T>(result: Result<Vec<T>>, token: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(token, error = %e, "lookup failed; treating as no match");
        Vec::new()
    })
}
