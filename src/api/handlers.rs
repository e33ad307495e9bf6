//! API endpoint handlers
//!
//! Provides handlers for:
//! - CSV upload summary (`POST <upload_path>`)
//! - Health check (`GET /health`)

use crate::api::types::HealthResponse;
use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::services::{Summary, UploadService};
use crate::state::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Json, Multipart, State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Multipart field carrying the CSV document
pub const FILE_FIELD: &str = "file";

/// Health check endpoint - GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse::ok(state.uptime_secs()))
}

/// CSV upload endpoint - POST <upload_path>
///
/// Expects a multipart form with a `file` field. The filename is checked
/// before any of the file content is read.
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Summary>> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Not a multipart request: {}", e);
        AppError::MissingFile
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, &state.config))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        UploadService::validate_filename(&filename)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, &state.config))?;
        info!("Received upload {} ({} bytes)", filename, bytes.len());

        return UploadService::summarize_bytes(&bytes, &state.config).map(Json);
    }

    Err(AppError::MissingFile)
}

fn multipart_error(err: MultipartError, config: &ServerConfig) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(config.max_upload_bytes)
    } else {
        AppError::Parse(format!("Invalid multipart body: {}", err))
    }
}
