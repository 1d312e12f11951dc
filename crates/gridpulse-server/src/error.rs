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

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gridpulse_core::LoadError;
use gridpulse_types::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Handler failure, answered with HTTP 500 and the `{success, error, message}` envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Loading or aggregating the dataset failed; `context` is the client-facing summary.
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: LoadError,
    },
}

impl ApiError {
    pub fn internal(context: &'static str) -> impl FnOnce(LoadError) -> Self {
        move |source| Self::Internal { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self::Internal { context, source } = self;
        error!(error = %source, "{context}");
        let body = ErrorResponse {
            success: false,
            error: context.to_owned(),
            message: source.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
