//! Classification letters and the per-division classification map.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Division;

/// Classification letter held by a member in one division.
///
/// Variants are declared in precedence order, so `GrandMaster < Master < ...`
/// and the minimum of a set is the member's highest classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassLetter {
    /// Grand Master.
    #[serde(rename = "GM")]
    GrandMaster,
    /// Master.
    #[serde(rename = "M")]
    Master,
    /// A class.
    #[serde(rename = "A")]
    A,
    /// B class.
    #[serde(rename = "B")]
    B,
    /// C class.
    #[serde(rename = "C")]
    C,
    /// D class.
    #[serde(rename = "D")]
    D,
}

/// Error returned when a string is not a classification letter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown classification letter {0:?}")]
pub struct UnknownClassLetter(pub String);

impl ClassLetter {
    /// Every letter, highest precedence first.
    pub const ALL: [Self; 6] = [
        Self::GrandMaster,
        Self::Master,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
    ];

    /// Letter as published by the federation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GrandMaster => "GM",
            Self::Master => "M",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Lowercase tag used in artefact names (`gm`, `m`, `a`, ...).
    #[must_use]
    pub const fn tier_tag(self) -> &'static str {
        match self {
            Self::GrandMaster => "gm",
            Self::Master => "m",
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
        }
    }
}

impl fmt::Display for ClassLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLetter {
    type Err = UnknownClassLetter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|letter| {
                letter.as_str().eq_ignore_ascii_case(trimmed)
                    || letter.tier_tag().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownClassLetter(value.to_owned()))
    }
}

/// Classification letters keyed by division.
///
/// Divisions without a letter (unclassified, `U`, `X`, blank) are simply
/// absent from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifications(BTreeMap<Division, ClassLetter>);

impl Classifications {
    /// Record `letter` for `division`.
    pub fn insert(&mut self, division: Division, letter: ClassLetter) {
        self.0.insert(division, letter);
    }

    /// Letter held in `division`, if any.
    #[must_use]
    pub fn get(&self, division: Division) -> Option<ClassLetter> {
        self.0.get(&division).copied()
    }

    /// Whether the member holds `letter` in any division.
    #[must_use]
    pub fn holds(&self, letter: ClassLetter) -> bool {
        self.0.values().any(|held| *held == letter)
    }

    /// Highest letter held across all divisions.
    #[must_use]
    pub fn highest(&self) -> Option<ClassLetter> {
        self.0.values().copied().min()
    }

    /// Whether no division carries a letter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(division, letter)` pairs in division order.
    pub fn iter(&self) -> impl Iterator<Item = (Division, ClassLetter)> + '_ {
        self.0.iter().map(|(division, letter)| (*division, *letter))
    }
}

impl FromIterator<(Division, ClassLetter)> for Classifications {
    fn from_iter<I: IntoIterator<Item = (Division, ClassLetter)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
