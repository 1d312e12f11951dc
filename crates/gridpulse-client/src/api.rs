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

use std::time::Duration;

use chrono::NaiveDate;
use gridpulse_types::{
    AggregatedResponse, DataResponse, DemandStats, ErrorResponse, FlowResponse, FlowType,
    HealthResponse, NationalDemandWeek, Period, ReloadResponse, RenewableShare, SeriesResponse,
    WeeklyAverage, YearResponse,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_PREFIX: &str = "/api/electricity";

/// Thin typed wrapper over the electricity REST routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a client for the API served at `base_url` (e.g. `http://localhost:3001`).
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self.client.post(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        error!(status = status.as_u16(), %message, "API request failed");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("/health").await
    }

    pub async fn all_data(&self) -> ClientResult<DataResponse> {
        self.get("/data").await
    }

    pub async fn year_data(&self, year: i32) -> ClientResult<YearResponse> {
        self.get(&format!("/data/year/{year}")).await
    }

    pub async fn aggregated(&self, period: Period) -> ClientResult<AggregatedResponse> {
        self.get(&format!("/data/aggregated/{period}")).await
    }

    pub async fn stats(&self) -> ClientResult<DemandStats> {
        self.get("/stats").await
    }

    pub async fn reload(&self) -> ClientResult<ReloadResponse> {
        self.post("/reload").await
    }

    pub async fn flow(&self, date: NaiveDate, flow_type: FlowType) -> ClientResult<FlowResponse> {
        self.get(&format!("/flow/{}/{flow_type}", date.format("%Y-%m-%d")))
            .await
    }

    pub async fn national_demand(&self) -> ClientResult<SeriesResponse<NationalDemandWeek>> {
        self.get("/nd").await
    }

    pub async fn wind(&self) -> ClientResult<SeriesResponse<WeeklyAverage>> {
        self.get("/wind").await
    }

    pub async fn solar(&self) -> ClientResult<SeriesResponse<WeeklyAverage>> {
        self.get("/solar").await
    }

    pub async fn renewables(&self) -> ClientResult<SeriesResponse<RenewableShare>> {
        self.get("/renewables").await
    }
}
