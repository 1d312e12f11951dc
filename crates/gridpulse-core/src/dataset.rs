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

//! Process-wide demand dataset with single-flight loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gridpulse_types::{DemandRecord, DemandStats};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::LoadResult;
use crate::loader::{self, LoadedData};

/// Parsed dataset. Immutable; a reload builds a new one.
#[derive(Debug)]
pub struct Dataset {
    pub records: Vec<DemandRecord>,
    pub stats: DemandStats,
}

impl From<LoadedData> for Dataset {
    fn from(loaded: LoadedData) -> Self {
        Self {
            records: loaded.records,
            stats: loaded.stats,
        }
    }
}

/// Lazily loaded dataset shared by every request handler.
///
/// Loads are serialised by `load_lock`, so callers racing on an empty cache wait for
/// the first parse instead of each starting their own.
#[derive(Debug)]
pub struct DatasetCache {
    csv_path: PathBuf,
    current: RwLock<Option<Arc<Dataset>>>,
    load_lock: Mutex<()>,
    loads: AtomicUsize,
}

impl DatasetCache {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            current: RwLock::new(None),
            load_lock: Mutex::new(()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Dataset if one is loaded, without triggering a parse.
    pub fn cached(&self) -> Option<Arc<Dataset>> {
        self.current.read().clone()
    }

    /// Number of CSV parses performed so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Return the loaded dataset, parsing the CSV on first use.
    pub async fn get(&self) -> LoadResult<Arc<Dataset>> {
        if let Some(dataset) = self.cached() {
            return Ok(dataset);
        }

        let _guard = self.load_lock.lock().await;
        // Another caller may have finished loading while we waited
        if let Some(dataset) = self.cached() {
            return Ok(dataset);
        }

        let dataset = self.load().await?;
        *self.current.write() = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the current dataset and parse the CSV again.
    ///
    /// On failure the cache stays empty and the next `get` retries the load.
    pub async fn reload(&self) -> LoadResult<Arc<Dataset>> {
        let _guard = self.load_lock.lock().await;
        self.current.write().take();

        let dataset = self.load().await?;
        *self.current.write() = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the current dataset without reloading.
    pub fn clear(&self) {
        self.current.write().take();
    }

    async fn load(&self) -> LoadResult<Arc<Dataset>> {
        let path = self.csv_path.clone();
        let loaded = tokio::task::spawn_blocking(move || loader::load_csv(&path)).await??;
        let loads = self.loads.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            records = loaded.records.len(),
            loads, "Demand dataset loaded into memory"
        );
        Ok(Arc::new(Dataset::from(loaded)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::test_support::{csv_row, write_csv};

    fn sample_csv(dir: &Path) -> PathBuf {
        let rows: Vec<String> = (1..=48)
            .map(|period| csv_row("2020-01-01", period, 30000.0, 27000.0, "0"))
            .collect();
        write_csv(dir, &rows)
    }

    #[tokio::test]
    async fn first_get_loads_and_later_gets_reuse() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DatasetCache::new(sample_csv(dir.path()));
        assert!(cache.cached().is_none());

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();

        assert_eq!(first.records.len(), 48);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_callers_share_one_parse() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(DatasetCache::new(sample_csv(dir.path())));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get().await.unwrap() })
            })
            .collect();

        let mut datasets = Vec::new();
        for handle in handles {
            datasets.push(handle.await.unwrap());
        }

        assert_eq!(cache.load_count(), 1);
        assert!(datasets.iter().all(|d| Arc::ptr_eq(d, &datasets[0])));
    }

    #[tokio::test]
    async fn reload_produces_a_fresh_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DatasetCache::new(sample_csv(dir.path()));

        let before = cache.get().await.unwrap();
        let after = cache.reload().await.unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_ne!(before.records.as_ptr(), after.records.as_ptr());
        assert_eq!(before.records, after.records);
        assert_eq!(cache.load_count(), 2);
    }

    #[tokio::test]
    async fn reload_picks_up_changed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_csv(dir.path());
        let cache = DatasetCache::new(&path);
        assert_eq!(cache.get().await.unwrap().records.len(), 48);

        write_csv(dir.path(), &[csv_row("2021-06-01", 1, 20000.0, 18000.0, "0")]);
        // Without reload the old snapshot is still served
        assert_eq!(cache.get().await.unwrap().records.len(), 48);
        assert_eq!(cache.reload().await.unwrap().records.len(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_propagated_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DatasetCache::new(dir.path().join("missing.csv"));

        let result = cache.get().await;
        assert!(matches!(result, Err(LoadError::Read { .. })));
        assert!(cache.cached().is_none());
        assert_eq!(cache.load_count(), 0);
    }
}
