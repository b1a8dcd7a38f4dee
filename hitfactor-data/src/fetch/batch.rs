//! Settled outcomes and the batch files that persist them.

use std::fmt;

use hitfactor_core::ClassLetter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::upstream::Operation;

/// Outcome of one member request, persisted whether or not it succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum SettledEntry {
    /// The request returned a JSON payload.
    Fulfilled {
        /// Member the request was for.
        member_number: String,
        /// Upstream payload.
        value: Value,
    },
    /// Every attempt failed.
    Failed {
        /// Member the request was for.
        member_number: String,
        /// Attempts made before giving up.
        attempts: u32,
        /// Final error message.
        error: String,
    },
}

impl SettledEntry {
    /// Member the entry belongs to.
    pub fn member_number(&self) -> &str {
        match self {
            Self::Fulfilled { member_number, .. } | Self::Failed { member_number, .. } => {
                member_number
            }
        }
    }

    /// Payload of a fulfilled entry.
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Fulfilled { value, .. } => Some(value),
            Self::Failed { .. } => None,
        }
    }

    /// Whether every attempt failed.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Name of the batch file for one `(operation, tier, slice)`.
///
/// Slices are numbered from 1.
///
/// # Examples
/// ```
/// use hitfactor_core::ClassLetter;
/// use hitfactor_data::fetch::BatchName;
/// use hitfactor_data::upstream::Operation;
///
/// let name = BatchName::new(Operation::Classifiers, ClassLetter::GrandMaster, 3);
/// assert_eq!(name.to_string(), "classifiers.gm.3.json");
/// assert_eq!(BatchName::parse("classifiers.gm.3.json"), Some(name));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchName {
    /// Operation fetched.
    pub operation: Operation,
    /// Priority tier the members came from.
    pub tier: ClassLetter,
    /// One-based slice number.
    pub slice: usize,
}

impl BatchName {
    /// Name for the given parts.
    #[must_use]
    pub const fn new(operation: Operation, tier: ClassLetter, slice: usize) -> Self {
        Self {
            operation,
            tier,
            slice,
        }
    }

    /// Parse a file name produced by [`BatchName`]'s `Display`.
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".json")?;
        let mut parts = stem.split('.');
        let operation = Operation::from_prefix(parts.next()?)?;
        let tier = parts.next()?.parse::<ClassLetter>().ok()?;
        let slice = parts.next()?.parse::<usize>().ok()?;
        if parts.next().is_some() || slice == 0 {
            return None;
        }
        Some(Self::new(operation, tier, slice))
    }
}

impl fmt::Display for BatchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.json",
            self.operation,
            self.tier.tier_tag(),
            self.slice
        )
    }
}
