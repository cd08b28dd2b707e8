// crates/geolocator-core/src/loader/http.rs
#![cfg(feature = "fetch")]

use super::common_io::needs_download;
use super::{BackupSource, JsonFileSource};
use crate::config::LocatorConfig;
use crate::error::{GeoError, Result};
use crate::model::raw::Snapshot;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Downloads the backup files into the cache directory, then reads them
/// like any local files.
///
/// A file is fetched only if it is missing or empty, unless the populate is
/// forced or `force_download` is set. A failed request is never retried: it
/// surfaces as [`GeoError::DataUnavailable`] straight away.
#[derive(Debug, Clone)]
pub struct HttpSource {
    files: Vec<(String, PathBuf)>,
    timeout: Duration,
    force_download: bool,
}

impl HttpSource {
    /// A single snapshot file at `url`, stored at `target`.
    pub fn new(url: impl Into<String>, target: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            files: vec![(url.into(), target.into())],
            timeout,
            force_download: false,
        }
    }

    pub fn from_config(config: &LocatorConfig) -> Self {
        Self {
            files: config.backup_files(),
            timeout: config.http_timeout,
            force_download: false,
        }
    }

    pub fn with_force_download(mut self, force: bool) -> Self {
        self.force_download = force;
        self
    }

    pub fn targets(&self) -> Vec<&Path> {
        self.files.iter().map(|(_, p)| p.as_path()).collect()
    }

    fn download(&self, client: &reqwest::blocking::Client, url: &str, target: &Path) -> Result<()> {
        info!(url, target = %target.display(), "downloading backup");
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| GeoError::unavailable(url, e))?;
        let bytes = response.bytes().map_err(|e| GeoError::unavailable(url, e))?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write next to the target and rename, so a broken transfer never
        // leaves a half-written backup behind.
        let partial = target.with_extension("part");
        {
            let mut file = fs::File::create(&partial)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&partial, target)?;
        debug!(bytes = bytes.len(), "backup downloaded");
        Ok(())
    }
}

impl BackupSource for HttpSource {
    fn describe(&self) -> String {
        self.files
            .iter()
            .map(|(url, _)| url.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn fetch(&self, force: bool) -> Result<Snapshot> {
        let force = force || self.force_download;
        let pending: Vec<&(String, PathBuf)> = self
            .files
            .iter()
            .filter(|(_, target)| needs_download(target, force))
            .collect();
        if pending.len() < self.files.len() {
            debug!(reused = self.files.len() - pending.len(), "reusing downloaded backups");
        }
        if !pending.is_empty() {
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| GeoError::unavailable(self.describe(), e))?;
            for (url, target) in pending {
                self.download(&client, url, target)?;
            }
        }
        JsonFileSource::from_paths(self.files.iter().map(|(_, p)| p.clone())).fetch(force)
    }
}
