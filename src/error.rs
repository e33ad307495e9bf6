//! Application error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Prefix carried by every failure raised while parsing or summarizing an upload
pub const PROCESSING_ERROR_PREFIX: &str = "Error processing file";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid file format. Please upload a CSV file.")]
    InvalidFormat,

    #[error("No file provided. Please upload a CSV file.")]
    MissingFile,

    #[error("Missing required column: '{0}'")]
    MissingColumn(String),

    #[error("{0}")]
    Parse(String),

    #[error("Upload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    #[error("{bucket} trend spans {buckets} buckets, limit is {limit}")]
    TooManyBuckets {
        bucket: &'static str,
        buckets: usize,
        limit: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidFormat | AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MissingColumn(_)
            | AppError::Parse(_)
            | AppError::TooManyBuckets { .. }
            | AppError::Csv(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Io(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidFormat => "INVALID_FORMAT",
            AppError::MissingFile => "MISSING_FILE",
            AppError::MissingColumn(_) => "MISSING_COLUMN",
            AppError::Parse(_) | AppError::Csv(_) => "PARSE_ERROR",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::TooManyBuckets { .. } => "TOO_MANY_BUCKETS",
            AppError::Io(_) => "IO_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the caller sent something we cannot accept
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

/// Serializable error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        // Upload rejections are reported as-is, everything after that point is a processing failure
        let message = match err {
            AppError::InvalidFormat | AppError::MissingFile | AppError::PayloadTooLarge(_) => {
                err.to_string()
            }
            _ => format!("{}: {}", PROCESSING_ERROR_PREFIX, err),
        };

        ErrorResponse {
            code: err.code().to_string(),
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let response = ErrorResponse::from(&self);

        if self.is_client_error() {
            warn!("Rejected upload ({}): {}", response.code, response.message);
        } else {
            error!("Upload failed ({}): {}", response.code, response.message);
        }

        let body = match self {
            // Kept byte-for-byte compatible with existing clients
            AppError::InvalidFormat => json!({ "error": response.message }),
            _ => json!({ "error": response.message, "code": response.code }),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
