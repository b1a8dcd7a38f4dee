//! Divisions a classifier score can be recorded under.
//!
//! The enum offers compile-time safety for division lookups and owns the
//! three spellings the upstream federation uses for the same division: the
//! canonical short code, the numeric API identifier, and the column name in
//! the periodic classification snapshot.
//!
//! # Examples
//! ```
//! use hitfactor_core::Division;
//!
//! assert_eq!(Division::Production.short_code(), "prod");
//! assert_eq!(Division::from_upstream_id(24), Some(Division::CarryOptics));
//! assert_eq!("ss".parse::<Division>(), Ok(Division::SingleStack));
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Equipment division under which a score is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Division {
    /// Open.
    Open,
    /// Limited.
    Limited,
    /// Limited 10.
    Limited10,
    /// Production.
    Production,
    /// Single Stack.
    SingleStack,
    /// Revolver.
    Revolver,
    /// Carry Optics.
    CarryOptics,
    /// Limited Optics.
    LimitedOptics,
    /// Pistol Caliber Carbine.
    Pcc,
}

/// Error returned when a string does not name a known division.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown division code {0:?}")]
pub struct UnknownDivision(pub String);

impl Division {
    /// Every division, in the order the federation lists them.
    pub const ALL: [Self; 9] = [
        Self::Open,
        Self::Limited,
        Self::Limited10,
        Self::Production,
        Self::SingleStack,
        Self::Revolver,
        Self::CarryOptics,
        Self::LimitedOptics,
        Self::Pcc,
    ];

    /// Canonical lowercase short code (e.g. `"prod"`).
    #[must_use]
    pub const fn short_code(self) -> &'static str {
        match self {
            Self::Open => "opn",
            Self::Limited => "ltd",
            Self::Limited10 => "l10",
            Self::Production => "prod",
            Self::SingleStack => "ss",
            Self::Revolver => "rev",
            Self::CarryOptics => "co",
            Self::LimitedOptics => "lo",
            Self::Pcc => "pcc",
        }
    }

    /// Numeric identifier used by the upstream classifier history API.
    #[must_use]
    pub const fn upstream_id(self) -> u32 {
        match self {
            Self::Open => 2,
            Self::Limited => 3,
            Self::Limited10 => 4,
            Self::Production => 5,
            Self::Revolver => 6,
            Self::SingleStack => 7,
            Self::CarryOptics => 24,
            Self::Pcc => 35,
            Self::LimitedOptics => 41,
        }
    }

    /// Map an upstream numeric identifier to a division.
    ///
    /// Unknown identifiers (legacy or unrelated divisions) return `None`;
    /// callers skip those entries rather than treating them as errors.
    #[must_use]
    pub fn from_upstream_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|division| division.upstream_id() == id)
    }

    /// Column name used for this division in the classification snapshot.
    #[must_use]
    pub const fn snapshot_column(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Limited => "LIMITED",
            Self::Limited10 => "LIMITED10",
            Self::Production => "PRODUCTION",
            Self::SingleStack => "SINGLESTACK",
            Self::Revolver => "REVOLVER",
            Self::CarryOptics => "CARRYOPTICS",
            Self::LimitedOptics => "LIMITEDOPTICS",
            Self::Pcc => "PCC",
        }
    }

    /// Map a snapshot column name to a division.
    #[must_use]
    pub fn from_snapshot_column(column: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|division| division.snapshot_column() == column)
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_code())
    }
}

impl FromStr for Division {
    type Err = UnknownDivision;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|division| division.short_code() == lowered)
            .ok_or_else(|| UnknownDivision(value.to_owned()))
    }
}

impl From<Division> for String {
    fn from(value: Division) -> Self {
        value.short_code().to_owned()
    }
}

impl TryFrom<String> for Division {
    type Error = UnknownDivision;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
