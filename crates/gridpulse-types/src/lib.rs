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

//! Shared domain and wire types for the GridPulse services and client.

pub mod aggregate;
pub mod api;
pub mod demand;

pub use aggregate::{
    AggregateBucket, FlowPoint, NationalDemandWeek, Period, RenewableShare, WeeklyAverage,
    WeeklyMetric, round2, week_start,
};
pub use api::{
    AggregatedResponse, DataResponse, ErrorResponse, FlowResponse, HealthResponse,
    ReloadResponse, SeriesResponse, YearResponse,
};
pub use demand::{DateRange, DemandRecord, DemandStats, FlowType, UnknownFlowType};
