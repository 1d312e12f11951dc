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

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::demand::DemandRecord;

/// Round to two decimal places, the precision used by every cached series.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Time bucket used by the aggregated endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

impl Period {
    pub const ALL: [Self; 3] = [Self::Day, Self::Week, Self::Month];

    /// Parse a path segment. Anything unrecognised buckets by day.
    pub fn from_path(segment: &str) -> Self {
        match segment {
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::Day,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Bucket key for a calendar day: `YYYY-MM-DD` for day and week, `YYYY-MM` for month.
    pub fn bucket_key(self, date: NaiveDate) -> String {
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Week => week_start(date).format("%Y-%m-%d").to_string(),
            Self::Month => date.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finalized demand aggregate for one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBucket {
    pub date: String,
    pub total_demand: f64,
    pub avg_demand: f64,
    pub max_demand: f64,
    pub min_demand: f64,
    pub count: usize,
    pub total_wind: f64,
    pub total_solar: f64,
    pub avg_wind: f64,
    pub avg_solar: f64,
}

/// Metric averaged per Monday-starting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeeklyMetric {
    NationalDemand,
    Wind,
    Solar,
}

impl WeeklyMetric {
    pub const ALL: [Self; 3] = [Self::NationalDemand, Self::Wind, Self::Solar];

    pub fn value(self, record: &DemandRecord) -> f64 {
        match self {
            Self::NationalDemand => record.national_demand,
            Self::Wind => record.wind_generation,
            Self::Solar => record.solar_generation,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NationalDemand => "national demand",
            Self::Wind => "wind generation",
            Self::Solar => "solar generation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAverage {
    pub week_start: NaiveDate,
    pub average: f64,
    pub total: f64,
    pub count: usize,
}

/// National demand week in the `/nd` wire shape (`averageND`, `totalND`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalDemandWeek {
    pub week_start: NaiveDate,
    #[serde(rename = "averageND")]
    pub average_nd: f64,
    #[serde(rename = "totalND")]
    pub total_nd: f64,
    pub count: usize,
}

impl From<WeeklyAverage> for NationalDemandWeek {
    fn from(week: WeeklyAverage) -> Self {
        Self {
            week_start: week.week_start,
            average_nd: week.average,
            total_nd: week.total,
            count: week.count,
        }
    }
}

/// Embedded renewable generation as a share of total consumption for one month.
///
/// Total consumption is national demand plus embedded wind and solar, since embedded
/// generation never reaches the transmission network that national demand measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewableShare {
    pub month: String,
    pub total_wind: f64,
    pub total_solar: f64,
    pub total_demand: f64,
    pub renewable_percentage: f64,
    pub count: usize,
}

/// One chart point of a daily interconnector flow series; `x` is `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPoint {
    pub x: String,
    pub y: f64,
}
