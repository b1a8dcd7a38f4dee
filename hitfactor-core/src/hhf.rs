//! Historical HHF revisions and point-in-time resolution.
//!
//! Each `(division, classifier)` pair owns an ordered list of revisions. A
//! score resolves against the revision whose effective date is the latest one
//! not after the shot date. A revision without an effective date applies from
//! the beginning of time.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Division, ResolvedHhf};

/// One HHF value and the date it came into force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HhfRevision {
    /// Division the revision applies to.
    pub division: Division,
    /// Classifier code.
    pub classifier: String,
    /// High hit factor.
    pub hhf: f64,
    /// First shot date the revision applies to.
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
}

/// Errors raised while building an [`HhfTable`].
#[derive(Debug, Error)]
pub enum HhfTableError {
    /// Two revisions for one pair share an effective date.
    #[error("overlapping HHF revisions for {division} {classifier} effective {effective}")]
    Overlap {
        /// Division of the clashing revisions.
        division: Division,
        /// Classifier of the clashing revisions.
        classifier: String,
        /// Shared effective date, or `always` for undated revisions.
        effective: String,
    },
    /// A revision carries a non-positive or non-finite HHF.
    #[error("invalid HHF {hhf} for {division} {classifier}")]
    InvalidValue {
        /// Division of the revision.
        division: Division,
        /// Classifier of the revision.
        classifier: String,
        /// Rejected value.
        hhf: f64,
    },
    /// The revision list could not be decoded.
    #[error("failed to decode HHF revisions: {source}")]
    Decode {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// How shot dates are taken into account when resolving an HHF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionPolicy {
    /// Use the revision in force on the shot date.
    #[default]
    PointInTime,
    /// Always use the most recent revision, ignoring shot dates.
    LatestOnly,
}

/// Resolves the HHF that applies to a score.
pub trait HhfResolver {
    /// Resolve the HHF for `classifier` in `division` on `shot_date`.
    ///
    /// `None` means the shot date could not be parsed.
    fn resolve(&self, division: Division, classifier: &str, shot_date: Option<NaiveDate>)
    -> ResolvedHhf;
}

type PairKey = (Division, String);

/// Ordered HHF revisions keyed by division and classifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HhfTable {
    revisions: BTreeMap<PairKey, Vec<(Option<NaiveDate>, f64)>>,
}

impl HhfTable {
    /// Build a table, sorting each pair's revisions by effective date.
    ///
    /// # Errors
    /// Returns [`HhfTableError::Overlap`] when a pair has two revisions with
    /// the same effective date (or two undated ones) and
    /// [`HhfTableError::InvalidValue`] for non-positive values.
    pub fn from_revisions(
        revisions: impl IntoIterator<Item = HhfRevision>,
    ) -> Result<Self, HhfTableError> {
        let mut grouped: BTreeMap<PairKey, Vec<(Option<NaiveDate>, f64)>> = BTreeMap::new();
        for revision in revisions {
            if !revision.hhf.is_finite() || revision.hhf <= 0.0 {
                return Err(HhfTableError::InvalidValue {
                    division: revision.division,
                    classifier: revision.classifier,
                    hhf: revision.hhf,
                });
            }
            grouped
                .entry((revision.division, revision.classifier))
                .or_default()
                .push((revision.effective_from, revision.hhf));
        }

        for ((division, classifier), entries) in &mut grouped {
            // `None` sorts before every date.
            entries.sort_by_key(|(effective, _)| *effective);
            if let Some(pair) = entries.windows(2).find(|pair| match pair {
                [first, second] => first.0 == second.0,
                _ => false,
            }) {
                let effective = pair
                    .first()
                    .and_then(|(effective, _)| *effective)
                    .map_or_else(|| "always".to_owned(), |date| date.to_string());
                return Err(HhfTableError::Overlap {
                    division: *division,
                    classifier: classifier.clone(),
                    effective,
                });
            }
        }

        Ok(Self { revisions: grouped })
    }

    /// Decode a JSON array of [`HhfRevision`] values.
    ///
    /// # Errors
    /// Returns [`HhfTableError::Decode`] for malformed input and any
    /// validation error raised by [`HhfTable::from_revisions`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HhfTableError> {
        let revisions: Vec<HhfRevision> = serde_json::from_reader(reader)
            .map_err(|source| HhfTableError::Decode { source })?;
        Self::from_revisions(revisions)
    }

    /// Number of `(division, classifier)` pairs with at least one revision.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Whether the table holds no revisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Most recent HHF for the pair.
    #[must_use]
    pub fn latest(&self, division: Division, classifier: &str) -> Option<f64> {
        self.entries(division, classifier)
            .and_then(|entries| entries.last())
            .map(|(_, hhf)| *hhf)
    }

    /// HHF that preceded the most recent one.
    #[must_use]
    pub fn previous(&self, division: Division, classifier: &str) -> Option<f64> {
        self.entries(division, classifier).and_then(|entries| {
            entries
                .len()
                .checked_sub(2)
                .and_then(|index| entries.get(index))
                .map(|(_, hhf)| *hhf)
        })
    }

    /// HHF in force on `date`.
    #[must_use]
    pub fn at(&self, division: Division, classifier: &str, date: NaiveDate) -> Option<f64> {
        let entries = self.entries(division, classifier)?;
        let applicable = entries.partition_point(|(effective, _)| {
            effective.is_none_or(|effective| effective <= date)
        });
        applicable
            .checked_sub(1)
            .and_then(|index| entries.get(index))
            .map(|(_, hhf)| *hhf)
    }

    /// Every pair present in the table.
    pub fn pairs(&self) -> impl Iterator<Item = (Division, &str)> {
        self.revisions
            .keys()
            .map(|(division, classifier)| (*division, classifier.as_str()))
    }

    /// Bind the table to a resolution policy.
    #[must_use]
    pub const fn with_policy(&self, policy: ResolutionPolicy) -> PolicyResolver<'_> {
        PolicyResolver {
            table: self,
            policy,
        }
    }

    fn entries(&self, division: Division, classifier: &str) -> Option<&[(Option<NaiveDate>, f64)]> {
        self.revisions
            .get(&(division, classifier.to_owned()))
            .map(Vec::as_slice)
    }
}

impl HhfResolver for HhfTable {
    fn resolve(
        &self,
        division: Division,
        classifier: &str,
        shot_date: Option<NaiveDate>,
    ) -> ResolvedHhf {
        self.with_policy(ResolutionPolicy::PointInTime)
            .resolve(division, classifier, shot_date)
    }
}

/// [`HhfTable`] paired with a [`ResolutionPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct PolicyResolver<'a> {
    table: &'a HhfTable,
    policy: ResolutionPolicy,
}

impl HhfResolver for PolicyResolver<'_> {
    fn resolve(
        &self,
        division: Division,
        classifier: &str,
        shot_date: Option<NaiveDate>,
    ) -> ResolvedHhf {
        let found = match (self.policy, shot_date) {
            (ResolutionPolicy::PointInTime, Some(date)) => {
                self.table.at(division, classifier, date)
            }
            // Unparseable dates fall back to the latest revision.
            (ResolutionPolicy::PointInTime, None) | (ResolutionPolicy::LatestOnly, _) => {
                self.table.latest(division, classifier)
            }
        };
        found.map_or(ResolvedHhf::Unknown, ResolvedHhf::Known)
    }
}
