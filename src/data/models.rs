//! Table data models

use chrono::NaiveDateTime;

pub const PRICE_COLUMN: &str = "price";
pub const VOLUME_COLUMN: &str = "volume";
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Price/volume observations in file order
///
/// Missing numeric cells are stored as `NaN`. When the source had a
/// timestamp column, `timestamps` holds one entry per row, `None` for a
/// blank cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    pub timestamps: Option<Vec<Option<NaiveDateTime>>>,
    pub prices: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl PriceTable {
    /// Number of data rows
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Whether the source carried a timestamp column
    pub fn has_timestamps(&self) -> bool {
        self.timestamps.is_some()
    }
}
