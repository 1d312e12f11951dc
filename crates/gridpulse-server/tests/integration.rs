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

#![allow(clippy::float_cmp)]

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;

use gridpulse_server::app;
use gridpulse_server::config::AppConfig;

const CSV_HEADER: &str = "settlement_date,settlement_period,nd,tsd,england_wales_demand,embedded_wind_generation,embedded_wind_capacity,embedded_solar_generation,embedded_solar_capacity,non_bm_stor,pump_storage_pumping,ifa_flow,ifa2_flow,britned_flow,moyle_flow,east_west_flow,nemo_flow,nsl_flow,is_holiday";

fn csv_row(date: &str, period: u8, nd: f64, demand: f64) -> String {
    format!(
        "{date},{period},{nd},{nd},{demand},120,2000,40,1500,0,0,{ifa},0,-{period},0,0,0,0,0",
        ifa = u32::from(period) * 10
    )
}

/// Full day of 2020-01-01, two rows in 2021 and one row with zero demand.
fn fixture_rows() -> Vec<String> {
    let mut rows: Vec<String> = (1..=48)
        .map(|p| csv_row("2020-01-01", p, 30000.0, 25000.0 + f64::from(p)))
        .collect();
    rows.push(csv_row("2021-03-10", 1, 28000.0, 24000.0));
    rows.push(csv_row("2021-03-11", 1, 28000.0, 24000.0));
    rows.push(csv_row("2021-03-12", 1, 28000.0, 0.0));
    rows
}

async fn spawn(router: axum::Router) -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let port = listener.local_addr().expect("No local addr").port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Test server error");
    });
    port
}

struct TestServer {
    electricity_port: u16,
    gas_port: u16,
    main_port: u16,
    cache_dir: PathBuf,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let csv_path = dir.path().join("historic_demand.csv");
        let mut content = String::from(CSV_HEADER);
        for row in fixture_rows() {
            content.push('\n');
            content.push_str(&row);
        }
        std::fs::write(&csv_path, content).expect("Failed to write fixture CSV");

        let dist = dir.path().join("dist");
        std::fs::create_dir_all(&dist).expect("Failed to create dist dir");
        std::fs::write(dist.join("index.html"), "<html>dashboard</html>")
            .expect("Failed to write index.html");

        let mut config = AppConfig::default();
        config.data.csv_path = csv_path;
        config.data.cache_dir = dir.path().join("cache");
        config.frontend.dist_dir = dist;
        let config = Arc::new(config);

        let service = app::electricity_service(&config);
        let electricity_port = spawn(app::electricity_app(&config, service)).await;
        let gas_port = spawn(app::gas_app(&config)).await;
        let main_port = spawn(app::main_app(Arc::clone(&config))).await;

        Self {
            electricity_port,
            gas_port,
            main_port,
            cache_dir: config.data.cache_dir.clone(),
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    /// Route a path to the service that owns its prefix.
    fn url(&self, path: &str) -> String {
        let port = if path.starts_with("/api/electricity") {
            self.electricity_port
        } else if path.starts_with("/api/gas") {
            self.gas_port
        } else {
            self.main_port
        };
        format!("http://127.0.0.1:{port}{path}")
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.get(path).await;
        let status = resp.status().as_u16();
        let body = resp.json().await.expect("Response was not JSON");
        (status, body)
    }

    async fn post_json(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = resp.status().as_u16();
        let body = resp.json().await.expect("Response was not JSON");
        (status, body)
    }
}

#[tokio::test]
async fn electricity_health_reports_ok() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "Electricity API");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn data_excludes_zero_demand_rows() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/data").await;

    assert_eq!(status, 200);
    assert_eq!(body["count"], 50);
    assert_eq!(body["data"].as_array().unwrap().len(), 50);
    assert_eq!(body["stats"]["totalRecords"], 50);
    assert_eq!(body["stats"]["minDemand"], 24000.0);
    assert_eq!(body["stats"]["dateRange"]["start"], "2020-01-01");
    assert_eq!(body["stats"]["dateRange"]["end"], "2021-03-11");

    let typed: gridpulse_types::DataResponse =
        serde_json::from_value(body.clone()).expect("body matches DataResponse");
    assert_eq!(typed.data.len(), typed.count);

    let first = &body["data"][0];
    assert_eq!(first["date"], "2020-01-01");
    assert_eq!(first["period"], 1);
    assert_eq!(first["nd"], 30000.0);
}

#[tokio::test]
async fn year_filter_returns_only_that_year() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/data/year/2021").await;

    assert_eq!(status, 200);
    assert_eq!(body["year"], 2021);
    assert_eq!(body["count"], 2);
    for row in body["data"].as_array().unwrap() {
        assert!(row["date"].as_str().unwrap().starts_with("2021-"));
    }
}

#[tokio::test]
async fn non_numeric_year_matches_nothing() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/data/year/abc").await;

    assert_eq!(status, 200);
    assert!(body["year"].is_null());
    assert_eq!(body["count"], 0);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn full_day_aggregates_into_one_bucket() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/data/aggregated/day").await;

    assert_eq!(status, 200);
    assert_eq!(body["period"], "day");
    let buckets = body["data"].as_array().unwrap();
    assert_eq!(buckets[0]["date"], "2020-01-01");
    assert_eq!(buckets[0]["count"], 48);
    let total: u64 = buckets.iter().map(|b| b["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 50);
}

#[tokio::test]
async fn week_buckets_start_on_monday() {
    let server = TestServer::start().await;
    let (_, body) = server.get_json("/api/electricity/data/aggregated/week").await;

    let keys: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["date"].as_str().unwrap())
        .collect();
    // 2020-01-01 is a Wednesday, 2021-03-10 a Wednesday
    assert_eq!(keys, ["2019-12-30", "2021-03-08"]);
}

#[tokio::test]
async fn unknown_period_falls_back_to_day() {
    let server = TestServer::start().await;
    let (status, body) = server
        .get_json("/api/electricity/data/aggregated/fortnight")
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["period"], "fortnight");
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn stats_endpoint_matches_dataset() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/stats").await;

    assert_eq!(status, 200);
    assert_eq!(body["totalRecords"], 50);
    assert_eq!(body["maxDemand"], 25048.0);
}

#[tokio::test]
async fn flow_series_is_labelled_by_half_hour() {
    let server = TestServer::start().await;
    let (status, body) = server
        .get_json("/api/electricity/flow/2020-01-01/ifaFlow")
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["flowType"], "ifaFlow");
    assert_eq!(body["count"], 48);
    assert_eq!(body["data"][0]["x"], "00:00");
    assert_eq!(body["data"][0]["y"], 10.0);
    assert_eq!(body["data"][47]["x"], "23:30");
}

#[tokio::test]
async fn unknown_flow_type_reads_as_zero() {
    let server = TestServer::start().await;
    let (status, body) = server
        .get_json("/api/electricity/flow/2020-01-01/teleportFlow")
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["flowType"], "teleportFlow");
    assert_eq!(body["count"], 48);
    let points = body["data"].as_array().unwrap();
    assert!(points.iter().all(|p| p["y"] == 0.0));
}

#[tokio::test]
async fn malformed_flow_date_matches_nothing() {
    let server = TestServer::start().await;
    let (status, body) = server
        .get_json("/api/electricity/flow/01-01-2020/ifaFlow")
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["date"], "01-01-2020");
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn national_demand_is_written_to_cache_dir() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/nd").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["weekStart"], "2019-12-30");
    assert_eq!(body["data"][0]["averageND"], 30000.0);
    assert_eq!(body["data"][0]["totalND"], 1_440_000.0);
    assert!(body["savedToFile"].is_string());
    assert!(server.cache_dir.join("nd_weekly_averages.json").exists());
}

#[tokio::test]
async fn renewables_report_monthly_share() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/renewables").await;

    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["month"], "2020-01");
    assert_eq!(body["data"][0]["count"], 48);
    assert!(server.cache_dir.join("renewable_monthly_share.json").exists());
}

#[tokio::test]
async fn reload_regenerates_cache_files() {
    let server = TestServer::start().await;
    let (status, body) = server.post_json("/api/electricity/reload").await;

    assert_eq!(status, 200);
    assert_eq!(body["count"], 50);
    for name in [
        "nd_weekly_averages.json",
        "wind_weekly_averages.json",
        "solar_weekly_averages.json",
        "renewable_monthly_share.json",
    ] {
        assert!(server.cache_dir.join(name).exists(), "{name} missing");
    }
}

#[tokio::test]
async fn gas_endpoints_are_stubbed() {
    let server = TestServer::start().await;

    let (status, body) = server.get_json("/api/gas/data").await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 0);
    assert_eq!(body["message"], "Gas service not yet implemented");

    let (_, stats) = server.get_json("/api/gas/stats").await;
    assert_eq!(stats["totalRecords"], 0);

    let (_, reload) = server.post_json("/api/gas/reload").await;
    assert_eq!(reload["count"], 0);
}

#[tokio::test]
async fn unknown_api_path_returns_json_404() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/electricity/nope").await;

    assert_eq!(status, 404);
    assert!(body["availableEndpoints"].is_array());
}

#[tokio::test]
async fn orchestrator_lists_upstream_health() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/api/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["service"], "Main Orchestrator");
    assert_eq!(
        body["services"]["electricity"],
        "http://localhost:3001/api/electricity/health"
    );
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let server = TestServer::start().await;
    let resp = server.get("/api/electricity/health").await;

    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert!(resp.headers().contains_key("content-security-policy"));
}

#[tokio::test]
async fn orchestrator_serves_spa_fallback() {
    let server = TestServer::start().await;
    let resp = server.get("/charts/weekly").await;

    assert_eq!(resp.status().as_u16(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("dashboard"));
}
