//! Member classification state built from the periodic directory snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ClassLetter, Classifications, dates::parse_upstream_date};

/// One member's classification state for a single snapshot.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hitfactor_core::{ClassLetter, Classifications, Division, MemberClassificationRecord};
///
/// let record = MemberClassificationRecord::new(
///     "A12345",
///     Some("125282".to_owned()),
///     Some("2025-06-30".to_owned()),
///     [(Division::Production, ClassLetter::A)].into_iter().collect::<Classifications>(),
/// );
/// let cutoff = NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date");
/// assert!(record.is_active_after(cutoff));
/// assert_eq!(record.highest_classification(), Some(ClassLetter::A));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberClassificationRecord {
    /// External member number (e.g. `A12345`).
    pub member_number: String,
    /// Internal upstream identifier.
    pub member_id: Option<String>,
    /// Expiration exactly as published.
    pub expires: Option<String>,
    /// Parsed expiration date; `None` when absent or malformed.
    pub expiration_date: Option<NaiveDate>,
    /// Per-division classification letters.
    pub classifications: Classifications,
}

impl MemberClassificationRecord {
    /// Build a record, parsing the raw expiration when possible.
    pub fn new(
        member_number: impl Into<String>,
        member_id: Option<String>,
        expires: Option<String>,
        classifications: Classifications,
    ) -> Self {
        let expiration_date = expires.as_deref().and_then(parse_upstream_date);
        Self {
            member_number: member_number.into(),
            member_id,
            expires,
            expiration_date,
            classifications,
        }
    }

    /// Whether the membership is still active after `cutoff`.
    ///
    /// Missing or unparseable expirations fail open: life memberships are
    /// published with placeholder values that do not parse as dates.
    #[must_use]
    pub fn is_active_after(&self, cutoff: NaiveDate) -> bool {
        self.expiration_date.is_none_or(|expires| expires > cutoff)
    }

    /// Highest classification letter held in any division.
    #[must_use]
    pub fn highest_classification(&self) -> Option<ClassLetter> {
        self.classifications.highest()
    }

    /// Whether the member is classified in at least one division.
    #[must_use]
    pub fn is_classified(&self) -> bool {
        !self.classifications.is_empty()
    }
}
