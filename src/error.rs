//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::logic::AnalysisError;

pub type AppResult<T> = Result<T, AppError>;

/// Message shown when the upload lacks a required column
pub const MISSING_COLUMNS_MESSAGE: &str =
    "Data must include 'timestamp', 'latitude', and 'longitude' columns.";

/// Message shown when the request carries no CSV at all
pub const NO_UPLOAD_MESSAGE: &str = "Upload a dataset to begin.";

#[derive(Debug)]
pub enum AppError {
    // Schema errors
    MissingColumns(Vec<String>),

    // Parameter errors
    ValidationError(String),

    // Anything that went wrong while processing the upload
    ProcessingError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MissingColumns(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, MISSING_COLUMNS_MESSAGE.to_string())
            }
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ProcessingError(msg) => {
                tracing::warn!("Processing error: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, format!("Error processing file: {}", msg))
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        if let AppError::MissingColumns(missing) = &self {
            body["missing"] = json!(missing);
        }

        (status, Json(body)).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::MissingColumns { missing } => AppError::MissingColumns(missing),
            AnalysisError::EmptyInput => AppError::ValidationError(NO_UPLOAD_MESSAGE.to_string()),
            other => AppError::ProcessingError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
