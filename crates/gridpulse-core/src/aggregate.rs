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

//! Pure aggregations over the demand records.
//!
//! Every function is stateless given its input slice. Bucketed outputs come back
//! sorted ascending by bucket key; a bucket only exists once a record lands in it, so
//! averages never divide by zero.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use gridpulse_types::{
    AggregateBucket, DemandRecord, FlowPoint, FlowType, Period, RenewableShare, WeeklyAverage,
    WeeklyMetric, round2, week_start,
};

#[derive(Debug, Default)]
struct BucketAccumulator {
    total_demand: f64,
    max_demand: f64,
    min_demand: f64,
    total_wind: f64,
    total_solar: f64,
    count: usize,
}

impl BucketAccumulator {
    fn push(&mut self, record: &DemandRecord) {
        if self.count == 0 {
            self.max_demand = record.demand;
            self.min_demand = record.demand;
        } else {
            self.max_demand = self.max_demand.max(record.demand);
            self.min_demand = self.min_demand.min(record.demand);
        }
        self.total_demand += record.demand;
        self.total_wind += record.wind_generation;
        self.total_solar += record.solar_generation;
        self.count += 1;
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "bucket counts stay far below 2^52"
    )]
    fn finish(self, date: String) -> AggregateBucket {
        let count = self.count as f64;
        AggregateBucket {
            date,
            total_demand: self.total_demand,
            avg_demand: self.total_demand / count,
            max_demand: self.max_demand,
            min_demand: self.min_demand,
            count: self.count,
            total_wind: self.total_wind,
            total_solar: self.total_solar,
            avg_wind: self.total_wind / count,
            avg_solar: self.total_solar / count,
        }
    }
}

/// Group demand by day, Monday-starting week or month.
pub fn aggregate(records: &[DemandRecord], period: Period) -> Vec<AggregateBucket> {
    let mut buckets: BTreeMap<String, BucketAccumulator> = BTreeMap::new();
    for record in records {
        buckets
            .entry(period.bucket_key(record.date))
            .or_default()
            .push(record);
    }

    buckets
        .into_iter()
        .map(|(key, bucket)| bucket.finish(key))
        .collect()
}

/// Weekly average of one metric, rounded to two decimals.
#[expect(
    clippy::cast_precision_loss,
    reason = "weekly counts are at most a few hundred"
)]
pub fn weekly_averages(records: &[DemandRecord], metric: WeeklyMetric) -> Vec<WeeklyAverage> {
    let mut weeks: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = weeks.entry(week_start(record.date)).or_insert((0.0, 0));
        entry.0 += metric.value(record);
        entry.1 += 1;
    }

    weeks
        .into_iter()
        .map(|(week_start, (total, count))| WeeklyAverage {
            week_start,
            average: round2(total / count as f64),
            total: round2(total),
            count,
        })
        .collect()
}

/// Monthly share of embedded wind and solar in total consumption, in percent.
pub fn monthly_renewable_share(records: &[DemandRecord]) -> Vec<RenewableShare> {
    #[derive(Default)]
    struct Month {
        wind: f64,
        solar: f64,
        demand: f64,
        count: usize,
    }

    let mut months: BTreeMap<String, Month> = BTreeMap::new();
    for record in records {
        let month = months
            .entry(Period::Month.bucket_key(record.date))
            .or_default();
        month.wind += record.wind_generation;
        month.solar += record.solar_generation;
        month.demand += record.national_demand;
        month.count += 1;
    }

    months
        .into_iter()
        .map(|(key, month)| {
            let renewable = month.wind + month.solar;
            let consumption = month.demand + renewable;
            let percentage = if consumption > 0.0 {
                renewable / consumption * 100.0
            } else {
                0.0
            };
            RenewableShare {
                month: key,
                total_wind: round2(month.wind),
                total_solar: round2(month.solar),
                total_demand: round2(month.demand),
                renewable_percentage: round2(percentage),
                count: month.count,
            }
        })
        .collect()
}

/// `HH:MM` start time of a settlement period (period 1 starts at 00:00).
#[expect(
    clippy::integer_division,
    clippy::modulo_arithmetic,
    reason = "splitting a half-hour index into hours and minutes"
)]
pub fn period_label(settlement_period: u8) -> String {
    let index = u32::from(settlement_period.saturating_sub(1));
    format!("{:02}:{:02}", index / 2, (index % 2) * 30)
}

/// Half-hourly flow series of one interconnector for one day, ordered by period.
///
/// An unrecognised interconnector (`None`) yields the day's periods with zero flow.
pub fn flow_series(
    records: &[DemandRecord],
    date: NaiveDate,
    flow_type: Option<FlowType>,
) -> Vec<FlowPoint> {
    let mut day: Vec<&DemandRecord> = records.iter().filter(|r| r.date == date).collect();
    day.sort_by_key(|r| r.settlement_period);

    day.into_iter()
        .map(|r| FlowPoint {
            x: period_label(r.settlement_period),
            y: flow_type.map_or(0.0, |flow| r.flow(flow)),
        })
        .collect()
}

/// Records whose settlement date falls in `year`.
pub fn filter_by_year(records: &[DemandRecord], year: i32) -> Vec<DemandRecord> {
    records
        .iter()
        .filter(|r| r.date.year() == year)
        .cloned()
        .collect()
}
