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

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveTime};
use gridpulse_types::{AggregateBucket, DemandRecord, DemandStats, Period};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::api::ApiClient;

/// Decimal places used for chart values until the user picks another precision.
pub const DEFAULT_PRECISION: u8 = 2;

/// One chart sample: `x` is the bucket start as milliseconds since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: i64,
    pub y: f64,
}

/// Monthly average wind and solar generation, one point per month in both series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindSolarSeries {
    pub wind: Vec<ChartPoint>,
    pub solar: Vec<ChartPoint>,
}

/// Fetched dashboard state plus the chart derivations computed from it.
///
/// Fetch failures are not returned to the caller; they are logged and kept in
/// [`DashboardStore::error_message`] until the next fetch starts.
#[derive(Debug)]
pub struct DashboardStore {
    client: ApiClient,
    records: Vec<DemandRecord>,
    aggregated: HashMap<Period, Vec<AggregateBucket>>,
    stats: Option<DemandStats>,
    error: Option<String>,
    selected_period: Period,
    selected_year: Option<i32>,
    precision: u8,
}

impl DashboardStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            aggregated: HashMap::new(),
            stats: None,
            error: None,
            selected_period: Period::Month,
            selected_year: None,
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn fetch_electricity_data(&mut self) {
        self.error = None;
        match self.client.all_data().await {
            Ok(response) => {
                info!(count = response.count, "Electricity data fetched");
                self.records = response.data;
                self.stats = Some(response.stats);
            }
            Err(e) => self.fail("Error loading data".to_owned(), &e),
        }
    }

    pub async fn fetch_aggregated(&mut self, period: Period) {
        self.error = None;
        match self.client.aggregated(period).await {
            Ok(response) => {
                self.aggregated.insert(period, response.data);
            }
            Err(e) => self.fail(format!("Error loading {period} data"), &e),
        }
    }

    pub async fn fetch_year(&mut self, year: i32) {
        self.error = None;
        match self.client.year_data(year).await {
            Ok(response) => self.records = response.data,
            Err(e) => self.fail(format!("Error loading {year} data"), &e),
        }
    }

    pub async fn fetch_stats(&mut self) {
        self.error = None;
        match self.client.stats().await {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => self.fail("Error loading statistics".to_owned(), &e),
        }
    }

    fn fail(&mut self, message: String, cause: &crate::ClientError) {
        error!(error = %cause, "{message}");
        self.error = Some(message);
    }

    pub fn set_selected_period(&mut self, period: Period) {
        self.selected_period = period;
    }

    pub fn set_selected_year(&mut self, year: Option<i32>) {
        self.selected_year = year;
    }

    pub fn set_precision(&mut self, precision: u8) {
        self.precision = precision;
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn records(&self) -> &[DemandRecord] {
        &self.records
    }

    /// Buckets fetched for `period`, empty if that period was never fetched.
    pub fn aggregated(&self, period: Period) -> &[AggregateBucket] {
        self.aggregated.get(&period).map_or(&[], Vec::as_slice)
    }

    pub fn stats(&self) -> Option<&DemandStats> {
        self.stats.as_ref()
    }

    pub fn selected_period(&self) -> Period {
        self.selected_period
    }

    pub fn selected_year(&self) -> Option<i32> {
        self.selected_year
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// England & Wales demand of every loaded record.
    pub fn chart_data(&self) -> Vec<ChartPoint> {
        self.records
            .iter()
            .filter_map(|record| self.point(epoch_millis(record.date), record.demand))
            .collect()
    }

    /// Average demand per bucket of the selected period.
    pub fn aggregated_chart_data(&self) -> Vec<ChartPoint> {
        self.aggregated(self.selected_period)
            .iter()
            .filter_map(|bucket| {
                let x = bucket_start(&bucket.date)?;
                self.point(x, bucket.avg_demand)
            })
            .collect()
    }

    /// Monthly average wind and solar generation over the loaded records.
    pub fn wind_solar_data(&self) -> WindSolarSeries {
        let mut months: BTreeMap<NaiveDate, (f64, f64, u32)> = BTreeMap::new();
        for record in &self.records {
            let Some(month) = NaiveDate::from_ymd_opt(record.date.year(), record.date.month(), 1)
            else {
                continue;
            };
            let entry = months.entry(month).or_insert((0.0, 0.0, 0));
            entry.0 += record.wind_generation;
            entry.1 += record.solar_generation;
            entry.2 += 1;
        }

        let mut series = WindSolarSeries::default();
        for (month, (wind, solar, count)) in months {
            let x = epoch_millis(month);
            let count = f64::from(count);
            series.wind.push(ChartPoint {
                x,
                y: round_to(wind / count, self.precision),
            });
            series.solar.push(ChartPoint {
                x,
                y: round_to(solar / count, self.precision),
            });
        }
        series
    }

    fn point(&self, x: i64, value: f64) -> Option<ChartPoint> {
        let y = round_to(value, self.precision);
        y.is_finite().then_some(ChartPoint { x, y })
    }
}

pub fn round_to(value: f64, precision: u8) -> f64 {
    let factor = 10_f64.powi(i32::from(precision));
    (value * factor).round() / factor
}

pub fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Start of an aggregate bucket key: `YYYY-MM-DD` for days and weeks, `YYYY-MM` for months.
fn bucket_start(key: &str) -> Option<i64> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d"))
        .ok()
        .map(epoch_millis)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn record_json(
        date: &str,
        period: u8,
        demand: f64,
        wind: f64,
        solar: f64,
    ) -> serde_json::Value {
        json!({
            "date": date, "period": period, "nd": demand * 1.1, "demand": demand,
            "windGeneration": wind, "windCapacity": 2000.0,
            "solarGeneration": solar, "solarCapacity": 1500.0,
            "ifaFlow": 0.0, "ifa2Flow": 0.0, "britnedFlow": 0.0, "moyleFlow": 0.0,
            "eastWestFlow": 0.0, "nemoFlow": 0.0, "nslFlow": 0.0, "isHoliday": false
        })
    }

    fn stats_json() -> serde_json::Value {
        json!({
            "totalRecords": 3,
            "dateRange": {"start": "2020-01-01", "end": "2020-02-01"},
            "maxDemand": 30000.0, "minDemand": 20000.0,
            "avgDemand": 25000.0, "totalDemand": 75000.0
        })
    }

    async fn store_with_data(server: &mut Server) -> DashboardStore {
        let _mock = server
            .mock("GET", "/api/electricity/data")
            .with_status(200)
            .with_body(
                json!({
                    "data": [
                        record_json("2020-01-01", 1, 25000.123, 100.0, 10.0),
                        record_json("2020-01-15", 1, 20000.0, 200.0, 21.0),
                        record_json("2020-02-01", 1, 30000.0, 50.0, 5.556),
                    ],
                    "stats": stats_json(),
                    "count": 3
                })
                .to_string(),
            )
            .create_async()
            .await;

        let mut store = DashboardStore::new(ApiClient::new(server.url()).unwrap());
        store.fetch_electricity_data().await;
        store
    }

    #[test]
    fn round_to_respects_precision() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.23456, 0), 1.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn epoch_millis_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(epoch_millis(date), 1_577_836_800_000);
    }

    #[test]
    fn bucket_start_accepts_month_keys() {
        assert_eq!(bucket_start("2020-01"), Some(1_577_836_800_000));
        assert_eq!(bucket_start("2020-01-01"), Some(1_577_836_800_000));
        assert_eq!(bucket_start("garbage"), None);
    }

    #[tokio::test]
    async fn chart_data_uses_demand_and_precision() {
        let mut server = Server::new_async().await;
        let mut store = store_with_data(&mut server).await;

        assert!(!store.has_error());
        assert_eq!(store.stats().unwrap().total_records, 3);

        let points = store.chart_data();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].x, 1_577_836_800_000);
        assert_eq!(points[0].y, 25000.12);

        store.set_precision(0);
        assert_eq!(store.chart_data()[0].y, 25000.0);
    }

    #[tokio::test]
    async fn wind_solar_data_averages_per_month() {
        let mut server = Server::new_async().await;
        let store = store_with_data(&mut server).await;

        let series = store.wind_solar_data();
        assert_eq!(series.wind.len(), 2);
        assert_eq!(series.wind[0].y, 150.0);
        assert_eq!(series.solar[0].y, 15.5);
        assert_eq!(series.solar[1].y, 5.56);
        assert!(series.wind[0].x < series.wind[1].x);
    }

    #[tokio::test]
    async fn aggregated_chart_follows_selected_period() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/electricity/data/aggregated/month")
            .with_status(200)
            .with_body(
                json!({
                    "period": "month",
                    "data": [{
                        "date": "2020-01", "totalDemand": 45000.0, "avgDemand": 22500.456,
                        "maxDemand": 25000.0, "minDemand": 20000.0, "count": 2,
                        "totalWind": 300.0, "totalSolar": 31.0,
                        "avgWind": 150.0, "avgSolar": 15.5
                    }],
                    "count": 1
                })
                .to_string(),
            )
            .create_async()
            .await;

        let mut store = DashboardStore::new(ApiClient::new(server.url()).unwrap());
        store.fetch_aggregated(Period::Month).await;

        let points = store.aggregated_chart_data();
        assert_eq!(points, [ChartPoint { x: 1_577_836_800_000, y: 22500.46 }]);

        store.set_selected_period(Period::Week);
        assert!(store.aggregated_chart_data().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_records_error_message() {
        let mut server = Server::new_async().await;
        let _year = server
            .mock("GET", "/api/electricity/data/year/2019")
            .with_status(500)
            .with_body(
                json!({"success": false, "error": "Error filtering", "message": "boom"})
                    .to_string(),
            )
            .create_async()
            .await;
        let _week = server
            .mock("GET", "/api/electricity/data/aggregated/week")
            .with_status(500)
            .create_async()
            .await;

        let mut store = DashboardStore::new(ApiClient::new(server.url()).unwrap());
        store.fetch_year(2019).await;
        assert_eq!(store.error_message(), Some("Error loading 2019 data"));

        store.fetch_aggregated(Period::Week).await;
        assert_eq!(store.error_message(), Some("Error loading week data"));
        assert!(store.aggregated(Period::Week).is_empty());
    }

    #[tokio::test]
    async fn successful_fetch_clears_previous_error() {
        let mut server = Server::new_async().await;
        let _failing = server
            .mock("GET", "/api/electricity/stats")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let mut store = DashboardStore::new(ApiClient::new(server.url()).unwrap());
        store.fetch_stats().await;
        assert_eq!(store.error_message(), Some("Error loading statistics"));

        server.reset_async().await;
        let _healthy = server
            .mock("GET", "/api/electricity/stats")
            .with_status(200)
            .with_body(stats_json().to_string())
            .create_async()
            .await;
        store.fetch_stats().await;
        assert!(!store.has_error());
        assert_eq!(store.stats().unwrap().total_records, 3);
    }
}
