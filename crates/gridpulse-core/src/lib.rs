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

//! Demand dataset loading, caching and aggregation.

pub mod aggregate;
pub mod dataset;
pub mod disk_cache;
pub mod error;
pub mod loader;
pub mod service;

pub use dataset::{Dataset, DatasetCache};
pub use disk_cache::{CacheFile, Cached, DiskCache};
pub use error::{LoadError, LoadResult};
pub use loader::{LoadedData, load_csv, parse_reader};
pub use service::{ElectricityService, GAS_NOT_IMPLEMENTED, GasService};
