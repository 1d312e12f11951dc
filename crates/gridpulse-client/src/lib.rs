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

//! Client side of the dashboard: [`ApiClient`] talks to the electricity API and
//! [`DashboardStore`] keeps fetched state and derives chart-ready series from it.

pub mod api;
pub mod error;
pub mod store;

pub use api::{ApiClient, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use store::{ChartPoint, DEFAULT_PRECISION, DashboardStore, WindSolarSeries};
