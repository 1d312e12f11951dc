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

//! Electricity and gas service facades used by the HTTP handlers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use gridpulse_types::{
    AggregateBucket, DemandRecord, DemandStats, FlowPoint, FlowType, Period, RenewableShare,
    WeeklyAverage, WeeklyMetric,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::aggregate;
use crate::dataset::{Dataset, DatasetCache};
use crate::disk_cache::{Cached, DiskCache};
use crate::error::LoadResult;

pub const RENEWABLES_CACHE_FILE: &str = "renewable_monthly_share.json";

pub fn weekly_cache_file(metric: WeeklyMetric) -> &'static str {
    match metric {
        WeeklyMetric::NationalDemand => "nd_weekly_averages.json",
        WeeklyMetric::Wind => "wind_weekly_averages.json",
        WeeklyMetric::Solar => "solar_weekly_averages.json",
    }
}

fn all_cache_files() -> impl Iterator<Item = &'static str> {
    WeeklyMetric::ALL
        .into_iter()
        .map(weekly_cache_file)
        .chain(std::iter::once(RENEWABLES_CACHE_FILE))
}

/// Lock order: `generation`, then a file guard, then the dataset load lock.
#[derive(Debug)]
pub struct ElectricityService {
    dataset: DatasetCache,
    disk: DiskCache,
    /// Held shared by every cache-file reader and writer, exclusively by `reload`.
    generation: RwLock<()>,
    /// One in-flight guard per cache file so a cold file is computed once.
    file_guards: parking_lot::Mutex<HashMap<&'static str, Arc<Mutex<()>>>>,
}

impl ElectricityService {
    pub fn new(csv_path: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset: DatasetCache::new(csv_path),
            disk: DiskCache::new(cache_dir),
            generation: RwLock::new(()),
            file_guards: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    pub fn dataset(&self) -> &DatasetCache {
        &self.dataset
    }

    pub fn disk(&self) -> &DiskCache {
        &self.disk
    }

    pub async fn all_data(&self) -> LoadResult<Arc<Dataset>> {
        self.dataset.get().await
    }

    pub async fn stats(&self) -> LoadResult<DemandStats> {
        Ok(self.dataset.get().await?.stats.clone())
    }

    pub async fn data_by_year(&self, year: i32) -> LoadResult<Vec<DemandRecord>> {
        let dataset = self.dataset.get().await?;
        Ok(aggregate::filter_by_year(&dataset.records, year))
    }

    pub async fn aggregated(&self, period: Period) -> LoadResult<Vec<AggregateBucket>> {
        let dataset = self.dataset.get().await?;
        Ok(aggregate::aggregate(&dataset.records, period))
    }

    pub async fn flow(
        &self,
        date: NaiveDate,
        flow_type: Option<FlowType>,
    ) -> LoadResult<Vec<FlowPoint>> {
        let dataset = self.dataset.get().await?;
        Ok(aggregate::flow_series(&dataset.records, date, flow_type))
    }

    /// Weekly averages of `metric`, served from the cache file when present.
    pub async fn weekly(&self, metric: WeeklyMetric) -> LoadResult<Cached<WeeklyAverage>> {
        self.cached_series(weekly_cache_file(metric), move |records| {
            aggregate::weekly_averages(records, metric)
        })
        .await
    }

    /// Monthly renewable shares, served from the cache file when present.
    pub async fn renewables(&self) -> LoadResult<Cached<RenewableShare>> {
        self.cached_series(RENEWABLES_CACHE_FILE, aggregate::monthly_renewable_share)
            .await
    }

    /// Recompute the weekly averages of `metric` and overwrite its cache file.
    pub async fn refresh_weekly(&self, metric: WeeklyMetric) -> LoadResult<Cached<WeeklyAverage>> {
        let name = weekly_cache_file(metric);
        let _generation = self.generation.read().await;
        let guard = self.file_guard(name);
        let _file = guard.lock().await;
        self.compute_and_store(name, move |records| {
            aggregate::weekly_averages(records, metric)
        })
        .await
    }

    /// Clear the in-memory dataset and the cache files, re-parse the CSV and
    /// regenerate every cache file. Returns the new record count.
    ///
    /// Waits for in-flight cache computations to finish first, so none of them can
    /// overwrite a regenerated file with data from the previous CSV.
    pub async fn reload(&self) -> LoadResult<usize> {
        let _generation = self.generation.write().await;
        self.dataset.clear();
        for name in all_cache_files() {
            self.disk.remove(name);
        }

        let dataset = self.dataset.reload().await?;

        for metric in WeeklyMetric::ALL {
            self.compute_and_store(weekly_cache_file(metric), move |records| {
                aggregate::weekly_averages(records, metric)
            })
            .await?;
        }
        self.compute_and_store(RENEWABLES_CACHE_FILE, aggregate::monthly_renewable_share)
            .await?;

        info!(records = dataset.records.len(), "Electricity data reloaded");
        Ok(dataset.records.len())
    }

    fn file_guard(&self, name: &'static str) -> Arc<Mutex<()>> {
        Arc::clone(self.file_guards.lock().entry(name).or_default())
    }

    async fn cached_series<T, F>(&self, name: &'static str, compute: F) -> LoadResult<Cached<T>>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce(&[DemandRecord]) -> Vec<T> + Send + 'static,
    {
        let _generation = self.generation.read().await;
        let guard = self.file_guard(name);
        let _file = guard.lock().await;

        // A caller that waited on the guard finds the file its predecessor wrote
        let disk = self.disk.clone();
        if let Some(cached) = tokio::task::spawn_blocking(move || disk.read::<T>(name)).await? {
            return Ok(cached);
        }
        self.compute_and_store(name, compute).await
    }

    /// Callers hold the generation lock and, outside `reload`, the file guard.
    async fn compute_and_store<T, F>(&self, name: &'static str, compute: F) -> LoadResult<Cached<T>>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&[DemandRecord]) -> Vec<T> + Send + 'static,
    {
        let dataset = self.dataset.get().await?;
        let disk = self.disk.clone();
        let cached =
            tokio::task::spawn_blocking(move || disk.store(name, compute(&dataset.records))).await?;
        Ok(cached)
    }
}

pub const GAS_NOT_IMPLEMENTED: &str = "Gas service not yet implemented";

/// Placeholder until a gas dataset is available: every query is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct GasService;

impl GasService {
    pub fn all_data(self) -> (Vec<DemandRecord>, DemandStats) {
        (Vec::new(), DemandStats::default())
    }

    pub fn stats(self) -> DemandStats {
        DemandStats::default()
    }

    pub fn reload(self) -> usize {
        0
    }
}
