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

//! Main orchestrator: health and service catalogue, plus the static dashboard bundle.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use gridpulse_types::HealthResponse;
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::AppConfig;
use crate::{electricity, gas};

pub const SERVICE_NAME: &str = "Main Orchestrator";

#[derive(Debug, Clone)]
pub struct OrchestratorState {
    pub config: Arc<AppConfig>,
}

/// `/api` routes plus the frontend bundle; unknown paths fall back to `index.html`.
pub fn router(state: OrchestratorState) -> Router {
    let dist = state.config.frontend.dist_dir.clone();
    let spa = ServeDir::new(&dist).fallback(ServeFile::new(dist.join("index.html")));

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api", get(catalogue_handler))
        .with_state(state)
        .fallback_service(spa)
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn health_handler(State(state): State<OrchestratorState>) -> Json<HealthResponse> {
    let upstream = &state.config.upstream;
    let services = BTreeMap::from([
        (
            "electricity".to_owned(),
            format!("{}{}/health", upstream.electricity_base_url, electricity::API_PREFIX),
        ),
        (
            "gas".to_owned(),
            format!("{}{}/health", upstream.gas_base_url, gas::API_PREFIX),
        ),
    ]);

    Json(HealthResponse {
        services: Some(services),
        ..HealthResponse::ok(SERVICE_NAME)
    })
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn catalogue_handler(State(state): State<OrchestratorState>) -> impl IntoResponse {
    let upstream = &state.config.upstream;
    let electricity_endpoint = |path: &str| format!("{}{path}", electricity::API_PREFIX);
    let gas_endpoint = |path: &str| format!("{}{path}", gas::API_PREFIX);

    Json(json!({
        "service": "Energy Dashboard Orchestrator",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Main server that orchestrates electricity and gas APIs",
        "services": {
            "electricity": {
                "url": upstream.electricity_base_url,
                "status": "Active",
                "endpoints": [
                    electricity_endpoint("/health"),
                    electricity_endpoint("/data"),
                    electricity_endpoint("/stats"),
                    electricity_endpoint("/data/aggregated/:period"),
                    electricity_endpoint("/nd"),
                ]
            },
            "gas": {
                "url": upstream.gas_base_url,
                "status": "Not yet implemented",
                "endpoints": [
                    gas_endpoint("/health"),
                    gas_endpoint("/data"),
                    gas_endpoint("/stats"),
                ]
            }
        },
        "mainEndpoints": {
            "health": "/api/health"
        }
    }))
}
