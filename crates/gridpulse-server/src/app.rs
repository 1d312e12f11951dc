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

//! Listener setup for the three services.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use gridpulse_core::{ElectricityService, GasService};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::electricity::{self, ElectricityState};
use crate::gas;
use crate::layers::with_common_layers;
use crate::orchestrator::{self, OrchestratorState};

pub fn electricity_service(config: &AppConfig) -> Arc<ElectricityService> {
    Arc::new(ElectricityService::new(
        config.data.csv_path.clone(),
        config.data.cache_dir.clone(),
    ))
}

pub fn electricity_app(config: &AppConfig, service: Arc<ElectricityService>) -> Router {
    with_common_layers(electricity::router(ElectricityState { service }), &config.cors)
}

pub fn gas_app(config: &AppConfig) -> Router {
    with_common_layers(gas::router(GasService), &config.cors)
}

pub fn main_app(config: Arc<AppConfig>) -> Router {
    let cors = config.cors.clone();
    with_common_layers(orchestrator::router(OrchestratorState { config }), &cors)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

pub async fn serve(name: &str, bind_address: &str, port: u16, app: Router) -> Result<()> {
    let addr = format!("{bind_address}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {name} on {addr}"))?;
    info!("{name} listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| format!("{name} server error"))?;
    info!("{name} stopped");
    Ok(())
}

pub async fn run_electricity(config: Arc<AppConfig>) -> Result<()> {
    let service = electricity_service(&config);
    info!(
        csv = %config.data.csv_path.display(),
        cache_dir = %config.data.cache_dir.display(),
        "Electricity data source configured"
    );
    let app = electricity_app(&config, service);
    serve(
        electricity::SERVICE_NAME,
        &config.server.bind_address,
        config.server.electricity_port,
        app,
    )
    .await
}

pub async fn run_gas(config: Arc<AppConfig>) -> Result<()> {
    info!("Gas service is not yet implemented, serving empty data");
    serve(
        gas::SERVICE_NAME,
        &config.server.bind_address,
        config.server.gas_port,
        gas_app(&config),
    )
    .await
}

pub async fn run_main(config: Arc<AppConfig>) -> Result<()> {
    info!(
        electricity = %config.upstream.electricity_base_url,
        gas = %config.upstream.gas_base_url,
        frontend = %config.frontend.dist_dir.display(),
        "Orchestrator upstreams"
    );
    let app = main_app(Arc::clone(&config));
    serve(
        orchestrator::SERVICE_NAME,
        &config.server.bind_address,
        config.server.main_port,
        app,
    )
    .await
}

/// Run all three services in this process; the first failure stops the others.
pub async fn run_all(config: Arc<AppConfig>) -> Result<()> {
    tokio::try_join!(
        run_electricity(Arc::clone(&config)),
        run_gas(Arc::clone(&config)),
        run_main(config),
    )?;
    Ok(())
}
