//! Server configuration
//!
//! Defaults suit a local deployment. Each field can be overridden through
//! a `CSV_SUMMARY_*` environment variable.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

const ENV_HOST: &str = "CSV_SUMMARY_HOST";
const ENV_PORT: &str = "CSV_SUMMARY_PORT";
const ENV_UPLOAD_PATH: &str = "CSV_SUMMARY_UPLOAD_PATH";
const ENV_MAX_UPLOAD_BYTES: &str = "CSV_SUMMARY_MAX_UPLOAD_BYTES";
const ENV_MAX_DAILY_BUCKETS: &str = "CSV_SUMMARY_MAX_DAILY_BUCKETS";
const ENV_MAX_HOURLY_BUCKETS: &str = "CSV_SUMMARY_MAX_HOURLY_BUCKETS";

/// Summary server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route the upload handler is mounted on
    pub upload_path: String,
    /// Request body cap, enforced before the multipart body is buffered
    pub max_upload_bytes: usize,
    /// Upper bound on daily trend buckets (100 000 days is ~273 years)
    pub max_daily_buckets: usize,
    /// Upper bound on hourly trend buckets (1 000 000 hours is ~114 years)
    pub max_hourly_buckets: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            upload_path: "/api/upload".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            max_daily_buckets: 100_000,
            max_hourly_buckets: 1_000_000,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let config = Self {
            host: value(ENV_HOST).unwrap_or(defaults.host),
            port: parse_var(ENV_PORT, value(ENV_PORT))?.unwrap_or(defaults.port),
            upload_path: value(ENV_UPLOAD_PATH).unwrap_or(defaults.upload_path),
            max_upload_bytes: parse_var(ENV_MAX_UPLOAD_BYTES, value(ENV_MAX_UPLOAD_BYTES))?
                .unwrap_or(defaults.max_upload_bytes),
            max_daily_buckets: parse_var(ENV_MAX_DAILY_BUCKETS, value(ENV_MAX_DAILY_BUCKETS))?
                .unwrap_or(defaults.max_daily_buckets),
            max_hourly_buckets: parse_var(ENV_MAX_HOURLY_BUCKETS, value(ENV_MAX_HOURLY_BUCKETS))?
                .unwrap_or(defaults.max_hourly_buckets),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::Config("host must not be empty".to_string()));
        }
        if !self.upload_path.starts_with('/') {
            return Err(AppError::Config(format!(
                "upload path must start with '/': {}",
                self.upload_path
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(AppError::Config("max_upload_bytes must be positive".to_string()));
        }
        if self.max_daily_buckets == 0 || self.max_hourly_buckets == 0 {
            return Err(AppError::Config("trend bucket limits must be positive".to_string()));
        }
        Ok(())
    }

    /// Address string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    raw.map(|s| {
        s.parse::<T>()
            .map_err(|e| AppError::Config(format!("{}={:?}: {}", name, s, e)))
    })
    .transpose()
}
