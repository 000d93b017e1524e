//! Aggregation of raw period records into dashboard summaries.
//!
//! Every function here is pure: records are borrowed, nothing is cached,
//! and the same input always yields the same summary. Input order does not
//! matter; records are sorted by period before any latest-period or trend
//! value is taken. Empty input yields the zeroed `Default` summary, and no
//! output field is ever NaN or infinite.

pub mod financial;
pub mod membership;
pub mod operations;
pub mod platform;
pub mod sales_marketing;
pub mod types;

pub use financial::compute_financial_stats;
pub use membership::compute_membership_stats;
pub use operations::compute_operations_stats;
pub use platform::compute_platform_stats;
pub use sales_marketing::compute_sales_marketing_stats;
pub use types::*;

/// Number of trailing periods carried in trend series (six-month charts).
pub const DEFAULT_TREND_PERIODS: usize = 6;

/// Map NaN and infinities to 0.
pub(crate) fn finite(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Division that yields 0 instead of NaN or infinity.
pub(crate) fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite(numerator / denominator)
}

/// `numerator / denominator` as a percentage clamped to 0..=100.
pub(crate) fn percent(numerator: f64, denominator: f64) -> f64 {
    clamp_pct(safe_div(numerator, denominator) * 100.0)
}

pub(crate) fn clamp_pct(x: f64) -> f64 {
    finite(x).clamp(0.0, 100.0)
}

/// Clamp to -100..=100 for signed percentage-like scores.
pub(crate) fn clamp_signed_pct(x: f64) -> f64 {
    finite(x).clamp(-100.0, 100.0)
}

pub(crate) fn sum_by<R>(records: &[&R], f: impl Fn(&R) -> f64) -> f64 {
    finite(records.iter().map(|&r| finite(f(r))).sum())
}

pub(crate) fn mean_by<R>(records: &[&R], f: impl Fn(&R) -> f64) -> f64 {
    safe_div(sum_by(records, f), records.len() as f64)
}

/// The last `n` records of an already-sorted slice.
pub(crate) fn trailing<'s, 'r, R>(sorted: &'s [&'r R], n: usize) -> &'s [&'r R] {
    &sorted[sorted.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(-5.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_safe_div_non_finite_inputs() {
        assert_eq!(safe_div(f64::NAN, 2.0), 0.0);
        assert_eq!(safe_div(f64::INFINITY, 2.0), 0.0);
        assert_eq!(safe_div(1.0, 1e-320), 0.0);
    }

    #[test]
    fn test_percent_clamps() {
        assert_eq!(percent(8.0, 10.0), 80.0);
        assert_eq!(percent(12.0, 10.0), 100.0);
        assert_eq!(percent(-3.0, 10.0), 0.0);
        assert_eq!(percent(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_signed_clamp() {
        assert_eq!(clamp_signed_pct(-250.0), -100.0);
        assert_eq!(clamp_signed_pct(42.0), 42.0);
        assert_eq!(clamp_signed_pct(f64::NAN), 0.0);
    }

    #[test]
    fn test_mean_of_nothing_is_zero() {
        let empty: Vec<&f64> = Vec::new();
        assert_eq!(mean_by(&empty, |x| *x), 0.0);
    }
}
