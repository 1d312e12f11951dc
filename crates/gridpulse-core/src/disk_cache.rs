// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridPulse.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! JSON files holding derived aggregates, so later runs can skip the CSV pass.
//!
//! There is no staleness check: a present and parseable file is served as-is until
//! it is deleted, which is what a reload does.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

/// Default directory for cache files.
pub const DEFAULT_CACHE_DIR: &str = "./data/cache";

/// On-disk layout of one cached series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheFile<T> {
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub data: Vec<T>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheFileRef<'a, T> {
    generated_at: DateTime<Utc>,
    count: usize,
    data: &'a [T],
}

/// A series together with where it lives on disk.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub data: Vec<T>,
    /// File backing the series, `None` if writing it failed
    pub path: Option<PathBuf>,
    /// True when the series was read from disk instead of computed
    pub from_disk: bool,
}

/// Directory of cache files addressed by file name.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read a cache file. Missing or unparseable files yield `None`.
    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Option<Cached<T>> {
        let path = self.path_for(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cache file not readable");
                return None;
            }
        };

        match serde_json::from_str::<CacheFile<T>>(&contents) {
            Ok(file) => {
                info!(
                    path = %path.display(),
                    entries = file.data.len(),
                    generated_at = %file.generated_at,
                    "Serving series from cache file"
                );
                Some(Cached {
                    data: file.data,
                    path: Some(path),
                    from_disk: true,
                })
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unparseable cache file");
                None
            }
        }
    }

    /// Write a cache file, replacing any previous one.
    ///
    /// Each write goes through its own temp file in the cache directory and is then
    /// renamed over the target, so concurrent writers never share a temp path and
    /// readers never see a half-written file.
    pub fn write<T: Serialize>(&self, name: &str, data: &[T]) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create cache directory {}", self.dir.display())
            })?;
        }

        let file = CacheFileRef {
            generated_at: Utc::now(),
            count: data.len(),
            data,
        };
        let json = serde_json::to_string_pretty(&file).context("Failed to serialize cache file")?;

        let path = self.path_for(name);
        let mut temp = NamedTempFile::new_in(&self.dir).with_context(|| {
            format!("Failed to create temp file in {}", self.dir.display())
        })?;
        temp.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write temp file {}", temp.path().display()))?;
        temp.persist(&path)
            .with_context(|| format!("Failed to move temp file to {}", path.display()))?;

        info!(path = %path.display(), entries = data.len(), "Saved series to cache file");
        Ok(path)
    }

    /// Persist freshly computed data. A write failure is logged and the data is still
    /// returned, just without a backing path.
    pub fn store<T: Serialize>(&self, name: &str, data: Vec<T>) -> Cached<T> {
        let path = match self.write(name, &data) {
            Ok(path) => Some(path),
            Err(e) => {
                error!(error = %format!("{e:#}"), "Failed to save series to cache file");
                None
            }
        };
        Cached {
            data,
            path,
            from_disk: false,
        }
    }

    /// Delete a cache file. Returns whether a file was removed.
    pub fn remove(&self, name: &str) -> bool {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed cache file");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove cache file");
                false
            }
        }
    }
}
