//! Services Layer
//!
//! Business logic behind the HTTP handlers. Handlers stay thin: they pull
//! the upload out of the request and hand it to a service.
//!
//! # Services
//!
//! - `UploadService` - Filename validation, decode + summarize an upload
//! - `SummaryService` - Statistics, daily/hourly trends, price differences
//! - `stats` - NaN-skipping column reducers

pub mod stats;
pub mod summary_service;
pub mod upload_service;

pub use summary_service::{
    Bucket, Finite, PriceSummary, Summary, SummaryService, Trend, VolumeSummary,
};
pub use upload_service::UploadService;
