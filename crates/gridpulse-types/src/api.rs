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

//! JSON envelopes shared by the HTTP services and the client.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateBucket, FlowPoint};
use crate::demand::{DemandRecord, DemandStats};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Upstream health URLs, only reported by the orchestrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<BTreeMap<String, String>>,
}

impl HealthResponse {
    pub fn ok(service: impl Into<String>) -> Self {
        Self {
            status: "OK".to_owned(),
            service: service.into(),
            timestamp: Utc::now(),
            message: None,
            services: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse {
    pub data: Vec<DemandRecord>,
    pub stats: DemandStats,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearResponse {
    /// `None` when the requested year was not a number
    pub year: Option<i32>,
    pub data: Vec<DemandRecord>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResponse {
    /// Period as requested in the path
    pub period: String,
    pub data: Vec<AggregateBucket>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    pub success: bool,
    pub data: Vec<FlowPoint>,
    /// Date and flow type echoed as requested
    pub date: String,
    pub flow_type: String,
    pub count: usize,
}

/// Envelope for the disk-cached series (weekly averages, renewable shares).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
    pub total_records: usize,
    /// Cache file backing this series, `None` when it could not be written
    pub saved_to_file: Option<String>,
}

impl<T> SeriesResponse<T> {
    pub fn new(data: Vec<T>, saved_to_file: Option<String>) -> Self {
        let count = data.len();
        Self {
            success: true,
            data,
            count,
            total_records: count,
            saved_to_file,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}
