use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::conversation::coordinator::TurnError;
use crate::profile::source::AcquisitionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Turn {sequence} is still in flight")]
    TurnInFlight { sequence: u64 },

    #[error("Profile acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        match &e {
            TurnError::EmptyMessage => AppError::Validation(e.to_string()),
            TurnError::InFlight(in_flight) => AppError::TurnInFlight {
                sequence: in_flight.sequence,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::TurnInFlight { sequence } => (
                StatusCode::CONFLICT,
                "TURN_IN_FLIGHT",
                format!("Still answering message {sequence}; wait for it to finish"),
            ),
            AppError::Acquisition(e) => {
                tracing::warn!("Profile acquisition failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "ACQUISITION_FAILED",
                    e.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
