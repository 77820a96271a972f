// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::db::StoreError;
use crate::models::effort::EffortScoreError;
use crate::models::PlatformVersion;
use crate::services::capability::Operation;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid effort score: {0}")]
    InvalidScore(#[from] EffortScoreError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{operation} requires platform version {required} or later (running {current})")]
    Unsupported {
        operation: Operation,
        required: PlatformVersion,
        current: PlatformVersion,
    },

    /// Store callback completed without results or an error.
    #[error("Health store returned an empty response")]
    EmptyResponse,

    #[error("Health store error: {0}")]
    Store(#[from] StoreError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the store rejected a call the platform does not implement.
    pub fn is_unrecognized_selector(&self) -> bool {
        matches!(self, AppError::Store(StoreError::UnrecognizedSelector(_)))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::InvalidScore(err) => {
                (StatusCode::BAD_REQUEST, "invalid_score", Some(err.to_string()))
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Unsupported { .. } => (
                StatusCode::NOT_IMPLEMENTED,
                "unsupported_platform",
                Some(self.to_string()),
            ),
            AppError::EmptyResponse => {
                tracing::error!("Health store protocol violation: empty response");
                (StatusCode::BAD_GATEWAY, "empty_response", None)
            }
            AppError::Store(StoreError::NotAuthorized(msg)) => {
                (StatusCode::FORBIDDEN, "not_authorized", Some(msg.clone()))
            }
            AppError::Store(StoreError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "not_found", Some(msg.clone()))
            }
            AppError::Store(err) => {
                tracing::error!(error = %err, "Health store error");
                (StatusCode::BAD_GATEWAY, "store_error", Some(err.to_string()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
