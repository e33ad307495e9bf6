//! API response types

use serde::{Deserialize, Serialize};

/// Health check body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: i64,
}

impl HealthResponse {
    pub fn ok(uptime_secs: i64) -> Self {
        Self {
            status: "ok".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs,
        }
    }
}
