//! Application state management

use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Read-only state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            started_at: Utc::now(),
        })
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
