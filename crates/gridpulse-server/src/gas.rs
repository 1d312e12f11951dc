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

//! Gas API placeholder under `/api/gas`. Every route answers with empty data.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use gridpulse_core::{GAS_NOT_IMPLEMENTED, GasService};
use gridpulse_types::{DataResponse, DemandStats, HealthResponse, ReloadResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const SERVICE_NAME: &str = "Gas API";
pub const API_PREFIX: &str = "/api/gas";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasStatsResponse {
    #[serde(flatten)]
    pub stats: DemandStats,
    pub message: String,
}

pub fn router(service: GasService) -> Router {
    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/data", get(data_handler))
        .route("/stats", get(stats_handler))
        .route("/reload", post(reload_handler))
        .with_state(service);

    Router::new()
        .route("/", get(root_handler))
        .nest(API_PREFIX, api)
        .fallback(not_found_handler)
}

fn endpoint(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "Not yet implemented",
        "endpoints": {
            "health": endpoint("/health"),
            "data": endpoint("/data"),
            "stats": endpoint("/stats"),
            "reload": endpoint("/reload"),
        }
    }))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Gas API endpoint not found",
            "availableEndpoints": [endpoint("/health"), endpoint("/data"), endpoint("/stats")],
        })),
    )
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: Some("Gas service is running but not yet implemented".to_owned()),
        ..HealthResponse::ok(SERVICE_NAME)
    })
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn data_handler(State(service): State<GasService>) -> Json<DataResponse> {
    let (data, stats) = service.all_data();
    Json(DataResponse {
        count: data.len(),
        data,
        stats,
        message: Some(GAS_NOT_IMPLEMENTED.to_owned()),
    })
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn stats_handler(State(service): State<GasService>) -> Json<GasStatsResponse> {
    Json(GasStatsResponse {
        stats: service.stats(),
        message: GAS_NOT_IMPLEMENTED.to_owned(),
    })
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn reload_handler(State(service): State<GasService>) -> Json<ReloadResponse> {
    Json(ReloadResponse {
        message: GAS_NOT_IMPLEMENTED.to_owned(),
        count: service.reload(),
    })
}
