//! Analytics rows and their published JSON shape.

use hitfactor_core::Division;
use serde::{Deserialize, Serialize};

use crate::InversePercentiles;

/// Derived statistics for one `(division, classifier)` pair.
///
/// Undefined values serialise as `null`, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierAnalytics {
    /// Division of the pair.
    pub division: Division,
    /// Classifier code.
    pub classifier: String,
    /// Latest HHF revision.
    pub hhf: Option<f64>,
    /// Revision preceding the latest one.
    #[serde(rename = "prevHHF")]
    pub prev_hhf: Option<f64>,
    /// Recommended HHF supplied for the pair.
    #[serde(rename = "recHHF")]
    pub rec_hhf: Option<f64>,
    /// Number of score records for the pair.
    pub runs: usize,
    /// `recHHF − hhf`.
    #[serde(rename = "recHHFChange")]
    pub rec_hhf_change: Option<f64>,
    /// `100 × (recHHF / hhf − 1)`.
    #[serde(rename = "recHHFChangePercent")]
    pub rec_hhf_change_percent: Option<f64>,
    /// Fraction of current percents at or above 100.
    #[serde(rename = "inverse100CurPercentPercentile")]
    pub inverse_100_cur_percent_percentile: Option<f64>,
    /// Fraction of current percents at or above 95.
    #[serde(rename = "inverse95CurPercentPercentile")]
    pub inverse_95_cur_percent_percentile: Option<f64>,
    /// Fraction of current percents at or above 85.
    #[serde(rename = "inverse85CurPercentPercentile")]
    pub inverse_85_cur_percent_percentile: Option<f64>,
    /// Fraction of current percents at or above 75.
    #[serde(rename = "inverse75CurPercentPercentile")]
    pub inverse_75_cur_percent_percentile: Option<f64>,
    /// Fraction of recommended percents at or above 100.
    #[serde(rename = "inverse100RecPercentPercentile")]
    pub inverse_100_rec_percent_percentile: Option<f64>,
    /// Fraction of recommended percents at or above 95.
    #[serde(rename = "inverse95RecPercentPercentile")]
    pub inverse_95_rec_percent_percentile: Option<f64>,
    /// Fraction of recommended percents at or above 85.
    #[serde(rename = "inverse85RecPercentPercentile")]
    pub inverse_85_rec_percent_percentile: Option<f64>,
    /// Fraction of recommended percents at or above 75.
    #[serde(rename = "inverse75RecPercentPercentile")]
    pub inverse_75_rec_percent_percentile: Option<f64>,
}

impl ClassifierAnalytics {
    /// Current-percent fractions, highest threshold first.
    #[must_use]
    pub const fn cur_percentiles(&self) -> InversePercentiles {
        InversePercentiles {
            p100: self.inverse_100_cur_percent_percentile,
            p95: self.inverse_95_cur_percent_percentile,
            p85: self.inverse_85_cur_percent_percentile,
            p75: self.inverse_75_cur_percent_percentile,
        }
    }

    /// Recommended-percent fractions, highest threshold first.
    #[must_use]
    pub const fn rec_percentiles(&self) -> InversePercentiles {
        InversePercentiles {
            p100: self.inverse_100_rec_percent_percentile,
            p95: self.inverse_95_rec_percent_percentile,
            p85: self.inverse_85_rec_percent_percentile,
            p75: self.inverse_75_rec_percent_percentile,
        }
    }
}
