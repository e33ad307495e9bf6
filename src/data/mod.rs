//! Tabular input for the summary service
//!
//! Decodes an uploaded CSV document into a [`PriceTable`], validating the
//! column layout on the way in.

pub mod models;
mod reader;
pub mod timestamp;

pub use models::{PriceTable, PRICE_COLUMN, TIMESTAMP_COLUMN, VOLUME_COLUMN};
