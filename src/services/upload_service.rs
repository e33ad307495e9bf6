//! Upload Service
//!
//! The single use case behind the HTTP endpoint: accept a named CSV upload
//! and turn it into a [`Summary`]. Kept free of HTTP types so it can be
//! driven directly.

use super::summary_service::{Summary, SummaryService};
use crate::config::ServerConfig;
use crate::data::PriceTable;
use crate::error::{AppError, Result};
use tracing::info;

const CSV_EXTENSION: &str = ".csv";

/// Upload service for business logic
pub struct UploadService;

impl UploadService {
    /// Reject anything that is not named like a CSV file
    ///
    /// Runs before the upload body is read.
    pub fn validate_filename(filename: &str) -> Result<()> {
        if filename.ends_with(CSV_EXTENSION) {
            Ok(())
        } else {
            Err(AppError::InvalidFormat)
        }
    }

    /// Decode and summarize an upload whose name was already validated
    pub fn summarize_bytes(bytes: &[u8], config: &ServerConfig) -> Result<Summary> {
        let table = PriceTable::from_csv_bytes(bytes)?;
        SummaryService::summarize(&table, config.max_daily_buckets, config.max_hourly_buckets)
    }

    /// Validate, decode and summarize a named upload
    pub fn process(filename: &str, bytes: &[u8], config: &ServerConfig) -> Result<Summary> {
        Self::validate_filename(filename)?;

        info!(
            "UploadService::process - {} ({} bytes)",
            filename,
            bytes.len()
        );

        Self::summarize_bytes(bytes, config)
    }
}
