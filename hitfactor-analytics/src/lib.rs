//! Per-classifier analytics derived from hydrated score records.
//!
//! Records are grouped by `(division, classifier)`. Each group reports its
//! HHF history, the recommended HHF and its delta, and inverse percentiles
//! of current and recommended percents at 100, 95, 85 and 75.
#![forbid(unsafe_code)]

mod aggregate;
mod error;
mod percentile;
mod publish;
mod types;

pub use aggregate::aggregate;
pub use error::AnalyticsError;
pub use percentile::{InversePercentiles, THRESHOLDS, inverse_percentile};
pub use publish::{ANALYTICS_FILE, write_analytics};
pub use types::ClassifierAnalytics;
