//! Externally supplied recommended HHFs.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{Division, HhfTableError};

/// One recommended HHF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedHhf {
    /// Division the recommendation applies to.
    pub division: Division,
    /// Classifier code.
    pub classifier: String,
    /// Recommended high hit factor.
    #[serde(rename = "recHHF")]
    pub rec_hhf: f64,
}

/// Recommended HHF per `(division, classifier)`.
///
/// The recommendation policy lives outside this crate; the table only carries
/// its results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendedHhfTable {
    values: BTreeMap<(Division, String), f64>,
}

impl RecommendedHhfTable {
    /// Build a table; later entries for the same pair win.
    ///
    /// # Errors
    /// Returns [`HhfTableError::InvalidValue`] for non-positive values.
    pub fn from_entries(
        entries: impl IntoIterator<Item = RecommendedHhf>,
    ) -> Result<Self, HhfTableError> {
        let mut values = BTreeMap::new();
        for entry in entries {
            if !entry.rec_hhf.is_finite() || entry.rec_hhf <= 0.0 {
                return Err(HhfTableError::InvalidValue {
                    division: entry.division,
                    classifier: entry.classifier,
                    hhf: entry.rec_hhf,
                });
            }
            values.insert((entry.division, entry.classifier), entry.rec_hhf);
        }
        Ok(Self { values })
    }

    /// Decode a JSON array of [`RecommendedHhf`] values.
    ///
    /// # Errors
    /// Returns [`HhfTableError::Decode`] for malformed input.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HhfTableError> {
        let entries: Vec<RecommendedHhf> = serde_json::from_reader(reader)
            .map_err(|source| HhfTableError::Decode { source })?;
        Self::from_entries(entries)
    }

    /// Recommended HHF for the pair.
    #[must_use]
    pub fn get(&self, division: Division, classifier: &str) -> Option<f64> {
        self.values
            .get(&(division, classifier.to_owned()))
            .copied()
    }

    /// Number of pairs with a recommendation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
