use std::collections::BTreeSet;
use std::io::Read;

use serde_json::Value;

use super::payload::json_text;

/// Known-bad record curated by hand: a data-entry error worth 158%.
const DEFAULT_KEYS: [&str; 1] = ["125282=23-01=2/18/24=CCS08=15.9574"];

/// Set of excluded records keyed by
/// `memberId=classifier=shotDate=clubId=hitFactor`.
///
/// Each part is the raw upstream text, so `15.9574` and `"15.9574"` match the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blacklist {
    keys: BTreeSet<String>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self {
            keys: DEFAULT_KEYS.iter().map(|key| (*key).to_owned()).collect(),
        }
    }
}

impl Blacklist {
    /// Blacklist without the curated defaults.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }

    /// Build the key for a record.
    #[must_use]
    pub fn key(member_id: &str, classifier: &str, sd: &str, club_id: &str, hit_factor: &str) -> String {
        [member_id, classifier, sd, club_id, hit_factor].join("=")
    }

    pub(super) fn key_for_values(
        member_id: &str,
        classifier: &Value,
        sd: &Value,
        club_id: &Value,
        hit_factor: &Value,
    ) -> String {
        Self::key(
            member_id,
            &json_text(classifier),
            &json_text(sd),
            &json_text(club_id),
            &json_text(hit_factor),
        )
    }

    /// Add a key.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    /// Add every key from a JSON array of strings.
    ///
    /// # Errors
    /// Returns the decode error for input that is not an array of strings.
    pub fn extend_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, serde_json::Error> {
        let keys: Vec<String> = serde_json::from_reader(reader)?;
        let before = self.keys.len();
        self.keys.extend(keys);
        Ok(self.keys.len() - before)
    }

    /// Whether `key` is excluded.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
