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

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One half-hourly settlement period of the historic demand dataset.
///
/// Field names on the wire follow the dashboard API (`nd`, `period`, camelCase for
/// the rest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandRecord {
    pub date: NaiveDate,
    /// Half-hour index within the day, 1..=48 (46 or 50 on clock-change days)
    #[serde(rename = "period")]
    pub settlement_period: u8,
    /// National demand (MW)
    #[serde(rename = "nd")]
    pub national_demand: f64,
    /// England & Wales demand (MW)
    pub demand: f64,
    pub wind_generation: f64,
    pub wind_capacity: f64,
    pub solar_generation: f64,
    pub solar_capacity: f64,
    pub ifa_flow: f64,
    pub ifa2_flow: f64,
    pub britned_flow: f64,
    pub moyle_flow: f64,
    pub east_west_flow: f64,
    pub nemo_flow: f64,
    pub nsl_flow: f64,
    pub is_holiday: bool,
}

impl DemandRecord {
    /// Interconnector flow for the given link (MW, positive is import)
    pub fn flow(&self, flow_type: FlowType) -> f64 {
        match flow_type {
            FlowType::IfaFlow => self.ifa_flow,
            FlowType::Ifa2Flow => self.ifa2_flow,
            FlowType::BritnedFlow => self.britned_flow,
            FlowType::MoyleFlow => self.moyle_flow,
            FlowType::EastWestFlow => self.east_west_flow,
            FlowType::NemoFlow => self.nemo_flow,
            FlowType::NslFlow => self.nsl_flow,
        }
    }
}

/// Interconnector selector used by the flow endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowType {
    #[default]
    IfaFlow,
    Ifa2Flow,
    BritnedFlow,
    MoyleFlow,
    EastWestFlow,
    NemoFlow,
    NslFlow,
}

impl FlowType {
    pub const ALL: [Self; 7] = [
        Self::IfaFlow,
        Self::Ifa2Flow,
        Self::BritnedFlow,
        Self::MoyleFlow,
        Self::EastWestFlow,
        Self::NemoFlow,
        Self::NslFlow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IfaFlow => "ifaFlow",
            Self::Ifa2Flow => "ifa2Flow",
            Self::BritnedFlow => "britnedFlow",
            Self::MoyleFlow => "moyleFlow",
            Self::EastWestFlow => "eastWestFlow",
            Self::NemoFlow => "nemoFlow",
            Self::NslFlow => "nslFlow",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFlowType(pub String);

impl fmt::Display for UnknownFlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown flow type: {}", self.0)
    }
}

impl std::error::Error for UnknownFlowType {}

impl FromStr for FlowType {
    type Err = UnknownFlowType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flow| flow.as_str() == s)
            .ok_or_else(|| UnknownFlowType(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Summary statistics over the England & Wales demand of every valid record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandStats {
    pub total_records: usize,
    pub date_range: DateRange,
    pub max_demand: f64,
    pub min_demand: f64,
    pub avg_demand: f64,
    pub total_demand: f64,
}

impl DemandStats {
    /// Fold one record into the running statistics. `avg_demand` is kept current.
    #[expect(
        clippy::cast_precision_loss,
        reason = "record counts stay far below 2^52"
    )]
    pub fn push(&mut self, record: &DemandRecord) {
        if self.total_records == 0 {
            self.max_demand = record.demand;
            self.min_demand = record.demand;
        } else {
            self.max_demand = self.max_demand.max(record.demand);
            self.min_demand = self.min_demand.min(record.demand);
        }
        self.total_records += 1;
        self.total_demand += record.demand;
        self.avg_demand = self.total_demand / self.total_records as f64;

        let range = &mut self.date_range;
        if range.start.is_none_or(|start| record.date < start) {
            range.start = Some(record.date);
        }
        if range.end.is_none_or(|end| record.date > end) {
            range.end = Some(record.date);
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record(date: &str, period: u8, demand: f64) -> DemandRecord {
    DemandRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        settlement_period: period,
        national_demand: demand + 1000.0,
        demand,
        wind_generation: 0.0,
        wind_capacity: 0.0,
        solar_generation: 0.0,
        solar_capacity: 0.0,
        ifa_flow: 0.0,
        ifa2_flow: 0.0,
        britned_flow: 0.0,
        moyle_flow: 0.0,
        east_west_flow: 0.0,
        nemo_flow: 0.0,
        nsl_flow: 0.0,
        is_holiday: false,
    }
}
