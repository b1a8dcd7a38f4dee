//! Canonical classifier score records and the percent maths applied to them.
//!
//! A [`ScoreRecord`] is created once per surviving upstream entry and is not
//! mutated after its HHF fields are resolved. For major-match records the
//! reported percent is authoritative; for every other record the comparable
//! value is recomputed as `100 × hit factor / HHF`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Division;

/// Sentinel reported for a percent that cannot be computed.
pub const PERCENT_SENTINEL: f64 = -1.0;

/// Upstream `source` marking an entry shot at a major match.
pub const MAJOR_MATCH_SOURCE: &str = "Major Match";

/// Upstream `source` marking a legacy entry without reliable hit-factor data.
pub const LEGACY_SOURCE: &str = "Legacy";

/// Outcome of resolving the HHF that applies to a record.
///
/// Serialises as a plain number: `-1` for [`ResolvedHhf::NotApplicable`],
/// `null` for [`ResolvedHhf::Unknown`], the value otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Option<f64>", from = "Option<f64>")]
pub enum ResolvedHhf {
    /// Major-match records carry an authoritative percent and need no HHF.
    NotApplicable,
    /// No revision exists for the record's division, classifier and date.
    Unknown,
    /// The HHF in force for the record.
    Known(f64),
}

impl ResolvedHhf {
    /// The usable HHF value: known, finite and positive.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Known(value) if value.is_finite() && value > 0.0 => Some(value),
            _ => None,
        }
    }

    /// Whether resolution found no applicable revision.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<ResolvedHhf> for Option<f64> {
    fn from(value: ResolvedHhf) -> Self {
        match value {
            ResolvedHhf::NotApplicable => Some(PERCENT_SENTINEL),
            ResolvedHhf::Unknown => None,
            ResolvedHhf::Known(hhf) => Some(hhf),
        }
    }
}

impl From<Option<f64>> for ResolvedHhf {
    #[expect(
        clippy::float_cmp,
        reason = "the sentinel is an exact literal written by this crate"
    )]
    fn from(value: Option<f64>) -> Self {
        match value {
            None => Self::Unknown,
            Some(hhf) if hhf == PERCENT_SENTINEL => Self::NotApplicable,
            Some(hhf) => Self::Known(hhf),
        }
    }
}

/// Compute `100 × hit factor / HHF`, or the sentinel when either side is
/// unusable or the result is not positive.
///
/// # Examples
/// ```
/// use hitfactor_core::{PERCENT_SENTINEL, ResolvedHhf, percent_of};
///
/// assert_eq!(percent_of(Some(9.0), ResolvedHhf::Known(100.0)), 9.0);
/// assert_eq!(percent_of(Some(9.0), ResolvedHhf::Unknown), PERCENT_SENTINEL);
/// assert_eq!(percent_of(None, ResolvedHhf::Known(100.0)), PERCENT_SENTINEL);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "percent recomputation is floating-point by definition"
)]
pub fn percent_of(hit_factor: Option<f64>, hhf: ResolvedHhf) -> f64 {
    let (Some(hit_factor), Some(hhf)) = (hit_factor, hhf.value()) else {
        return PERCENT_SENTINEL;
    };
    positive_or_sentinel(100.0 * hit_factor / hhf)
}

fn positive_or_sentinel(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        PERCENT_SENTINEL
    }
}

/// Whether `percent` is a real value rather than the sentinel or `NaN`.
#[must_use]
pub fn is_valid_percent(percent: f64) -> bool {
    percent.is_finite() && percent >= 0.0
}

/// Canonical classifier score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Classifier code (e.g. `99-01`).
    pub classifier: String,
    /// Shot date exactly as published (`sd`).
    pub sd: String,
    /// Parsed shot date, when `sd` is a recognised date.
    pub shot_date: Option<NaiveDate>,
    /// Club identifier.
    pub club_id: String,
    /// Club display name.
    pub club_name: String,
    /// Percent as reported upstream.
    pub percent: Option<f64>,
    /// Hit factor; absent for percent-only entries or unparseable values.
    pub hit_factor: Option<f64>,
    /// Classification letter reported alongside the entry.
    pub code: Option<String>,
    /// Upstream source label (`Major Match`, `Club`, ...).
    pub source: String,
    /// Member number the score belongs to.
    pub member_number: String,
    /// Division the score was shot in.
    pub division: Division,
    /// HHF in force when the score was shot.
    pub hhf: ResolvedHhf,
    /// Recommended HHF, filled by a later pass.
    pub rec_hhf: ResolvedHhf,
}

impl ScoreRecord {
    /// Whether the record comes from a major match.
    #[must_use]
    pub fn is_major(&self) -> bool {
        self.source == MAJOR_MATCH_SOURCE
    }

    /// Percent against the HHF in force when the score was shot.
    ///
    /// Major-match records return the reported percent unchanged.
    #[must_use]
    pub fn cur_percent(&self) -> f64 {
        self.percent_against(self.hhf)
    }

    /// Percent against the recommended HHF.
    #[must_use]
    pub fn rec_percent(&self) -> f64 {
        self.percent_against(self.rec_hhf)
    }

    /// Difference between the reported and recomputed percent, or the
    /// sentinel when no recomputed percent exists.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "difference of two percents"
    )]
    pub fn percent_minus_cur_percent(&self) -> f64 {
        let current = self.cur_percent();
        match self.percent {
            Some(reported) if is_valid_percent(current) => reported - current,
            _ => PERCENT_SENTINEL,
        }
    }

    /// Percent against an arbitrary `hhf`, following the same rules as
    /// [`ScoreRecord::cur_percent`].
    #[must_use]
    pub fn percent_against(&self, hhf: ResolvedHhf) -> f64 {
        if self.is_major() {
            return self
                .percent
                .filter(|percent| is_valid_percent(*percent))
                .unwrap_or(PERCENT_SENTINEL);
        }
        percent_of(self.hit_factor, hhf)
    }
}
