// crates/geolocator-core/src/alias.rs

//! Static token rewrites applied before any lookup.
//!
//! * [`AliasTable`] maps common alternate tokens ("USA", "UK") to canonical
//!   names. Exact, case-sensitive match.
//! * [`MisspellingTable`] maps misspelled country names to canonical names.
//!   Keys are compared after stripping non-ASCII characters.
//!
//! Both ship embedded in the crate and can be replaced from a CSV file.

use crate::error::Result;
use crate::text::strip_non_ascii;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const EMBEDDED_ALIASES: &str = include_str!("../data/aliases.csv");
const EMBEDDED_MISSPELLINGS: &str = include_str!("../data/country_misspellings.csv");

#[derive(Debug, Deserialize)]
struct AliasRow {
    name: String,
    alias: String,
}

#[derive(Debug, Deserialize)]
struct MisspellingRow {
    misspelling: String,
    name: String,
}

fn read_rows<R: Read, T: for<'de> Deserialize<'de>>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

// ---- ALIASES ----

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// The table bundled with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_ALIASES.as_bytes())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<AliasRow> = read_rows(reader)?;
        let aliases: HashMap<String, String> =
            rows.into_iter().map(|r| (r.name, r.alias)).collect();
        debug!(count = aliases.len(), "loaded alias table");
        Ok(Self { aliases })
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.aliases.get(token).map(String::as_str)
    }

    /// Returns the canonical name for `token`, or `token` itself.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.get(token).unwrap_or(token)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

// ---- MISSPELLINGS ----

#[derive(Debug, Clone, Default)]
pub struct MisspellingTable {
    corrections: HashMap<String, String>,
}

impl MisspellingTable {
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_MISSPELLINGS.as_bytes())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<MisspellingRow> = read_rows(reader)?;
        let corrections: HashMap<String, String> = rows
            .into_iter()
            .map(|r| (strip_non_ascii(&r.misspelling), r.name))
            .collect();
        debug!(count = corrections.len(), "loaded misspelling table");
        Ok(Self { corrections })
    }

    /// Canonical country name for a misspelled one, if known.
    pub fn correct(&self, name: &str) -> Option<&str> {
        self.corrections
            .get(&strip_non_ascii(name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}
