//! HTTP API module
//!
//! Provides:
//! - CSV upload summary (`POST <upload_path>`, default `/api/upload`)
//! - Health check (`GET /health`)

pub mod handlers;
mod server;
mod types;

pub use server::{build_router, SummaryServer};
pub use types::HealthResponse;
