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

//! Electricity API: demand data, aggregates and cached series under `/api/electricity`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use gridpulse_core::{Cached, Dataset, ElectricityService};
use gridpulse_types::{
    AggregatedResponse, DemandStats, FlowResponse, FlowType, HealthResponse, NationalDemandWeek,
    Period, ReloadResponse, RenewableShare, SeriesResponse, WeeklyAverage, WeeklyMetric,
    YearResponse,
};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::json;
use tracing::info;

use crate::error::ApiError;

pub const SERVICE_NAME: &str = "Electricity API";
pub const API_PREFIX: &str = "/api/electricity";

#[derive(Debug, Clone)]
pub struct ElectricityState {
    pub service: Arc<ElectricityService>,
}

/// Routes for the electricity service, including the root description and JSON 404.
pub fn router(state: ElectricityState) -> Router {
    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/data", get(data_handler))
        .route("/data/year/{year}", get(year_handler))
        .route("/data/aggregated/{period}", get(aggregated_handler))
        .route("/stats", get(stats_handler))
        .route("/reload", post(reload_handler))
        .route("/flow/{date}/{flow_type}", get(flow_handler))
        .route("/nd", get(national_demand_handler))
        .route("/wind", get(wind_handler))
        .route("/solar", get(solar_handler))
        .route("/renewables", get(renewables_handler))
        .with_state(state);

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
        "endpoints": {
            "health": endpoint("/health"),
            "data": endpoint("/data"),
            "stats": endpoint("/stats"),
            "aggregated": endpoint("/data/aggregated/:period"),
            "year": endpoint("/data/year/:year"),
            "reload": endpoint("/reload"),
            "flow": endpoint("/flow/:date/:flowType"),
            "nd": endpoint("/nd"),
            "wind": endpoint("/wind"),
            "solar": endpoint("/solar"),
            "renewables": endpoint("/renewables"),
        }
    }))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Electricity API endpoint not found",
            "availableEndpoints": [endpoint("/health"), endpoint("/data"), endpoint("/stats")],
        })),
    )
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok(SERVICE_NAME))
}

/// `/data` body serialized straight from the shared dataset, in the
/// [`gridpulse_types::DataResponse`] shape.
struct DatasetBody(Arc<Dataset>);

impl Serialize for DatasetBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut body = serializer.serialize_struct("DataResponse", 3)?;
        body.serialize_field("data", &self.0.records)?;
        body.serialize_field("stats", &self.0.stats)?;
        body.serialize_field("count", &self.0.records.len())?;
        body.end()
    }
}

async fn data_handler(
    State(state): State<ElectricityState>,
) -> Result<Json<DatasetBody>, ApiError> {
    let dataset = state
        .service
        .all_data()
        .await
        .map_err(ApiError::internal("Error processing electricity data"))?;

    Ok(Json(DatasetBody(dataset)))
}

async fn year_handler(
    State(state): State<ElectricityState>,
    Path(year): Path<String>,
) -> Result<Json<YearResponse>, ApiError> {
    // A year that is not a number matches no records
    let year = year.trim().parse::<i32>().ok();
    let data = match year {
        Some(year) => state
            .service
            .data_by_year(year)
            .await
            .map_err(ApiError::internal("Error filtering electricity data"))?,
        None => Vec::new(),
    };

    Ok(Json(YearResponse {
        year,
        count: data.len(),
        data,
    }))
}

async fn aggregated_handler(
    State(state): State<ElectricityState>,
    Path(period): Path<String>,
) -> Result<Json<AggregatedResponse>, ApiError> {
    let data = state
        .service
        .aggregated(Period::from_path(&period))
        .await
        .map_err(ApiError::internal("Error aggregating electricity data"))?;

    Ok(Json(AggregatedResponse {
        period,
        count: data.len(),
        data,
    }))
}

async fn stats_handler(
    State(state): State<ElectricityState>,
) -> Result<Json<DemandStats>, ApiError> {
    let stats = state
        .service
        .stats()
        .await
        .map_err(ApiError::internal("Error calculating electricity statistics"))?;
    Ok(Json(stats))
}

async fn reload_handler(
    State(state): State<ElectricityState>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let count = state
        .service
        .reload()
        .await
        .map_err(ApiError::internal("Error reloading electricity data"))?;

    info!(count, "Reload requested over HTTP completed");
    Ok(Json(ReloadResponse {
        message: "Electricity data reloaded successfully".to_owned(),
        count,
    }))
}

async fn flow_handler(
    State(state): State<ElectricityState>,
    Path((date, flow_type)): Path<(String, String)>,
) -> Result<Json<FlowResponse>, ApiError> {
    // Unknown dates match no records; unknown interconnectors read as zero flow
    let data = match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(day) => state
            .service
            .flow(day, flow_type.parse::<FlowType>().ok())
            .await
            .map_err(ApiError::internal("Error getting Flow data"))?,
        Err(_) => Vec::new(),
    };

    Ok(Json(FlowResponse {
        success: true,
        count: data.len(),
        data,
        date,
        flow_type,
    }))
}

fn series_response<T>(cached: Cached<T>) -> Json<SeriesResponse<T>> {
    let saved_to_file = cached.path.map(|p| p.display().to_string());
    Json(SeriesResponse::new(cached.data, saved_to_file))
}

async fn weekly_series(
    state: &ElectricityState,
    metric: WeeklyMetric,
    context: &'static str,
) -> Result<Cached<WeeklyAverage>, ApiError> {
    let cached = state
        .service
        .weekly(metric)
        .await
        .map_err(ApiError::internal(context))?;
    info!(
        metric = metric.label(),
        weeks = cached.data.len(),
        from_disk = cached.from_disk,
        "Weekly averages served"
    );
    Ok(cached)
}

async fn national_demand_handler(
    State(state): State<ElectricityState>,
) -> Result<Json<SeriesResponse<NationalDemandWeek>>, ApiError> {
    let cached = weekly_series(
        &state,
        WeeklyMetric::NationalDemand,
        "Error getting National Demand data",
    )
    .await?;

    Ok(series_response(Cached {
        data: cached.data.into_iter().map(NationalDemandWeek::from).collect(),
        path: cached.path,
        from_disk: cached.from_disk,
    }))
}

async fn wind_handler(
    State(state): State<ElectricityState>,
) -> Result<Json<SeriesResponse<WeeklyAverage>>, ApiError> {
    let cached = weekly_series(&state, WeeklyMetric::Wind, "Error getting wind generation data")
        .await?;
    Ok(series_response(cached))
}

async fn solar_handler(
    State(state): State<ElectricityState>,
) -> Result<Json<SeriesResponse<WeeklyAverage>>, ApiError> {
    let cached = weekly_series(&state, WeeklyMetric::Solar, "Error getting solar generation data")
        .await?;
    Ok(series_response(cached))
}

async fn renewables_handler(
    State(state): State<ElectricityState>,
) -> Result<Json<SeriesResponse<RenewableShare>>, ApiError> {
    let cached = state
        .service
        .renewables()
        .await
        .map_err(ApiError::internal("Error getting renewable share data"))?;
    Ok(series_response(cached))
}
