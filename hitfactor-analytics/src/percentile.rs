//! Inverse cumulative fractions over percent distributions.

use hitfactor_core::is_valid_percent;

/// Thresholds reported for every classifier, highest first.
pub const THRESHOLDS: [f64; 4] = [100.0, 95.0, 85.0, 75.0];

/// Fraction of valid percents at or above `threshold`.
///
/// Sentinel and `NaN` values are excluded from both numerator and
/// denominator. Returns `None` when no valid value remains.
///
/// # Examples
/// ```
/// use hitfactor_analytics::inverse_percentile;
///
/// assert_eq!(inverse_percentile(&[10.0, 9.0], 9.5), Some(0.5));
/// assert_eq!(inverse_percentile(&[-1.0, 50.0], 40.0), Some(1.0));
/// assert_eq!(inverse_percentile(&[-1.0], 40.0), None);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "a fraction of run counts is floating-point by definition"
)]
pub fn inverse_percentile(values: &[f64], threshold: f64) -> Option<f64> {
    let (valid, at_or_above) = values
        .iter()
        .copied()
        .filter(|value| is_valid_percent(*value))
        .fold((0_usize, 0_usize), |(valid, above), value| {
            (valid + 1, above + usize::from(value >= threshold))
        });
    (valid > 0).then(|| at_or_above as f64 / valid as f64)
}

/// Inverse percentiles for the four reported thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InversePercentiles {
    /// Fraction at or above 100%.
    pub p100: Option<f64>,
    /// Fraction at or above 95%.
    pub p95: Option<f64>,
    /// Fraction at or above 85%.
    pub p85: Option<f64>,
    /// Fraction at or above 75%.
    pub p75: Option<f64>,
}

impl InversePercentiles {
    /// Compute every reported threshold over `values`.
    #[must_use]
    pub fn over(values: &[f64]) -> Self {
        let [p100, p95, p85, p75] =
            THRESHOLDS.map(|threshold| inverse_percentile(values, threshold));
        Self {
            p100,
            p95,
            p85,
            p75,
        }
    }

    /// Values in threshold order, highest threshold first.
    #[must_use]
    pub const fn as_array(&self) -> [Option<f64>; 4] {
        [self.p100, self.p95, self.p85, self.p75]
    }
}
