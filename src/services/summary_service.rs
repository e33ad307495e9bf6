//! Summary Service
//!
//! Builds the statistical summary ("truth table") of an uploaded price/volume
//! table: descriptive statistics, daily and hourly mean-price trends, and the
//! consecutive price difference series.

use super::stats;
use crate::data::timestamp::format_label;
use crate::data::PriceTable;
use crate::error::{AppError, Result};
use chrono::{DurationRound, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Numeric output value, `null` unless finite
///
/// Every number in a [`Summary`] goes through this type so that `NaN` and
/// infinities never reach the JSON encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Finite(Option<f64>);

impl Finite {
    pub fn new(value: f64) -> Self {
        Self(Some(value).filter(|v| v.is_finite()))
    }

    pub fn value(self) -> Option<f64> {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_none()
    }
}

impl From<f64> for Finite {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Price column statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub mean: Finite,
    pub max: Finite,
    pub min: Finite,
    pub std_dev: Finite,
    pub median: Finite,
    /// Sample std-dev of percent change, in percent
    pub volatility: Finite,
}

/// Volume column statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub mean: Finite,
    pub max: Finite,
    pub min: Finite,
    pub std_dev: Finite,
    pub total: Finite,
}

/// Bucket label -> mean price, in chronological order
pub type Trend = BTreeMap<String, Finite>;

/// Full summary returned by the upload endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub price: PriceSummary,
    pub volume: VolumeSummary,
    pub daily_trend: Trend,
    pub hourly_trend: Trend,
    pub price_trend: Vec<Finite>,
}

/// Resampling bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Day,
    Hour,
}

impl Bucket {
    pub fn width(self) -> TimeDelta {
        match self {
            Bucket::Day => TimeDelta::days(1),
            Bucket::Hour => TimeDelta::hours(1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Day => "daily",
            Bucket::Hour => "hourly",
        }
    }

    /// Start of the bucket containing `ts`
    pub fn floor(self, ts: NaiveDateTime) -> Result<NaiveDateTime> {
        ts.duration_trunc(self.width())
            .map_err(|e| AppError::Parse(format!("Cannot bucket timestamp {}: {}", ts, e)))
    }
}

/// Summary service for business logic
pub struct SummaryService;

impl SummaryService {
    /// Summarize a decoded table
    ///
    /// Trend mappings stay empty when the table has no timestamp column.
    pub fn summarize(
        table: &PriceTable,
        max_daily_buckets: usize,
        max_hourly_buckets: usize,
    ) -> Result<Summary> {
        let (daily_trend, hourly_trend) = match &table.timestamps {
            Some(times) => (
                Self::resample_mean(times, &table.prices, Bucket::Day, max_daily_buckets)?,
                Self::resample_mean(times, &table.prices, Bucket::Hour, max_hourly_buckets)?,
            ),
            None => (Trend::new(), Trend::new()),
        };

        let summary = Summary {
            price: Self::summarize_price(&table.prices),
            volume: Self::summarize_volume(&table.volumes),
            daily_trend,
            hourly_trend,
            price_trend: Self::diff_series(&table.prices),
        };

        info!(
            "SummaryService::summarize - {} rows, {} daily / {} hourly buckets",
            table.len(),
            summary.daily_trend.len(),
            summary.hourly_trend.len()
        );

        Ok(summary)
    }

    pub fn summarize_price(prices: &[f64]) -> PriceSummary {
        PriceSummary {
            mean: stats::mean(prices).into(),
            max: stats::max(prices).into(),
            min: stats::min(prices).into(),
            std_dev: stats::std_dev(prices).into(),
            median: stats::median(prices).into(),
            volatility: (stats::std_dev(&stats::pct_change(prices)) * 100.0).into(),
        }
    }

    pub fn summarize_volume(volumes: &[f64]) -> VolumeSummary {
        VolumeSummary {
            mean: stats::mean(volumes).into(),
            max: stats::max(volumes).into(),
            min: stats::min(volumes).into(),
            std_dev: stats::std_dev(volumes).into(),
            total: stats::sum(volumes).into(),
        }
    }

    /// Mean of `values` per time bucket
    ///
    /// Buckets run contiguously from the earliest to the latest observed
    /// bucket; buckets with no (non-missing) values map to null. Rows
    /// without a timestamp are ignored.
    pub fn resample_mean(
        times: &[Option<NaiveDateTime>],
        values: &[f64],
        bucket: Bucket,
        max_buckets: usize,
    ) -> Result<Trend> {
        let mut sums: BTreeMap<NaiveDateTime, (f64, usize)> = BTreeMap::new();

        for (time, value) in times.iter().zip(values) {
            let Some(time) = time else { continue };
            let entry = sums.entry(bucket.floor(*time)?).or_insert((0.0, 0));
            if !value.is_nan() {
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let (Some(first), Some(last)) = (
            sums.keys().next().copied(),
            sums.keys().next_back().copied(),
        ) else {
            return Ok(Trend::new());
        };

        let width = bucket.width();
        let span = (last - first).num_seconds() / width.num_seconds();
        let buckets = usize::try_from(span).unwrap_or(usize::MAX).saturating_add(1);
        if buckets > max_buckets {
            return Err(AppError::TooManyBuckets {
                bucket: bucket.as_str(),
                buckets,
                limit: max_buckets,
            });
        }

        let mut trend = Trend::new();
        let mut cursor = first;
        while cursor <= last {
            let mean = match sums.get(&cursor) {
                Some((total, count)) if *count > 0 => total / *count as f64,
                _ => f64::NAN,
            };
            trend.insert(format_label(&cursor), mean.into());
            cursor += width;
        }

        Ok(trend)
    }

    /// Consecutive price differences, first entry null
    pub fn diff_series(values: &[f64]) -> Vec<Finite> {
        stats::diff(values).into_iter().map(Finite::from).collect()
    }
}
