//! Column reducers
//!
//! Every reducer skips missing observations (`NaN`) and returns `NaN` when
//! the result is undefined, e.g. the mean of an empty column.

use statrs::statistics::{Data, Median, Statistics};

fn observed(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

pub fn sum(values: &[f64]) -> f64 {
    observed(values).sum()
}

pub fn mean(values: &[f64]) -> f64 {
    observed(values).mean()
}

pub fn max(values: &[f64]) -> f64 {
    Statistics::max(observed(values))
}

pub fn min(values: &[f64]) -> f64 {
    Statistics::min(observed(values))
}

/// Sample standard deviation (n - 1 denominator)
pub fn std_dev(values: &[f64]) -> f64 {
    observed(values).std_dev()
}

pub fn median(values: &[f64]) -> f64 {
    let samples: Vec<f64> = observed(values).collect();
    if samples.is_empty() {
        return f64::NAN;
    }
    Data::new(samples).median()
}

/// Consecutive differences, `NaN` in the first slot
pub fn diff(values: &[f64]) -> Vec<f64> {
    pairwise(values, |prev, cur| cur - prev)
}

/// Fractional change between consecutive values, `NaN` in the first slot
///
/// A zero predecessor yields an infinite (or `NaN` for 0/0) change.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    pairwise(values, |prev, cur| cur / prev - 1.0)
}

fn pairwise(values: &[f64], op: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    std::iter::once(f64::NAN)
        .chain(values.windows(2).map(|w| op(w[0], w[1])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reducers_skip_missing() {
        let values = [1.0, f64::NAN, 3.0];
        assert_eq!(sum(&values), 4.0);
        assert_eq!(mean(&values), 2.0);
        assert_eq!(max(&values), 3.0);
        assert_eq!(min(&values), 1.0);
        assert_eq!(median(&values), 2.0);
    }

    #[test]
    fn test_empty_column() {
        assert_eq!(sum(&[]), 0.0);
        assert!(mean(&[]).is_nan());
        assert!(max(&[]).is_nan());
        assert!(min(&[]).is_nan());
        assert!(median(&[]).is_nan());
        assert!(std_dev(&[]).is_nan());
        assert!(diff(&[]).is_empty());
    }

    #[test]
    fn test_sample_std_dev() {
        // mean 5, squared deviations sum to 32, n - 1 = 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((std_dev(&values) - expected).abs() < 1e-12);

        assert!(std_dev(&[4.2]).is_nan());
        assert_eq!(std_dev(&[3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_median_even_length() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[110.0, f64::NAN, 100.0]), 105.0);
    }

    #[test]
    fn test_diff() {
        let d = diff(&[100.0, 110.0, 105.0]);
        assert!(d[0].is_nan());
        assert_eq!(&d[1..], &[10.0, -5.0]);

        let d = diff(&[1.0, f64::NAN, 4.0]);
        assert!(d[1].is_nan());
        assert!(d[2].is_nan());
    }

    #[test]
    fn test_pct_change() {
        let p = pct_change(&[100.0, 110.0, 99.0]);
        assert!(p[0].is_nan());
        assert!((p[1] - 0.1).abs() < 1e-12);
        assert!((p[2] + 0.1).abs() < 1e-12);

        let p = pct_change(&[0.0, 5.0, 0.0, 0.0]);
        assert!(p[1].is_infinite());
        assert_eq!(p[2], -1.0);
        assert!(p[3].is_nan());
    }
}
