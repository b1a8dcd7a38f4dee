//! Member and classification directory built from the periodic snapshot.
//!
//! The snapshot is a comma-delimited text file with a `$FIELDS` header naming
//! the columns. [`DirectoryBuilder`] turns it into one
//! [`MemberClassificationRecord`] per member line and partitions the active,
//! classified members into [`PriorityTiers`].
#![forbid(unsafe_code)]

mod meta;
mod snapshot;
mod tiers;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use hitfactor_core::{ClassLetter, Division, MemberClassificationRecord};
use thiserror::Error;

pub use meta::{DirectoryWriteError, TierReadError, read_tiers, write_meta};
pub use tiers::PriorityTiers;

/// Errors raised when the snapshot text cannot be interpreted at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotFormatError {
    /// The snapshot contained no text.
    #[error("classification snapshot is empty")]
    Empty,
    /// No `$FIELDS` header naming the member number column was found.
    #[error("classification snapshot has no $FIELDS header")]
    MissingHeader,
}

/// Builds a [`Directory`] from snapshot text.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use hitfactor_core::ClassLetter;
/// use hitfactor_data::directory::DirectoryBuilder;
///
/// let text = "$FIELDS USPSA,PersonNumber,Expires,OPEN,PRODUCTION\n\
///             A1,11,2030-01-01,GM,B\n\
///             A2,12,2020-01-01,M,\n\
///             A3,13,2030-01-01,U,A\n";
/// let cutoff = NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date");
/// let directory = DirectoryBuilder::new()
///     .with_active_after(cutoff)
///     .build(text)
///     .expect("snapshot parses");
/// assert_eq!(directory.members().len(), 3);
/// assert_eq!(directory.tiers().get(ClassLetter::GrandMaster), ["A1"]);
/// assert!(directory.tiers().get(ClassLetter::Master).is_empty());
/// assert_eq!(directory.tiers().get(ClassLetter::A), ["A3"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryBuilder {
    active_after: Option<NaiveDate>,
}

impl DirectoryBuilder {
    /// Builder that treats every member as active.
    #[must_use]
    pub const fn new() -> Self {
        Self { active_after: None }
    }

    /// Only schedule members whose membership is active after `cutoff`.
    #[must_use]
    pub const fn with_active_after(mut self, cutoff: NaiveDate) -> Self {
        self.active_after = Some(cutoff);
        self
    }

    /// Parse `text` and compute the priority tiers.
    ///
    /// # Errors
    /// Returns [`SnapshotFormatError`] when the text is empty or lacks a
    /// field header.
    pub fn build(&self, text: &str) -> Result<Directory, SnapshotFormatError> {
        let members = snapshot::parse_members(text)?;
        let tiers = PriorityTiers::partition(
            members
                .iter()
                .filter(|member| self.is_active(member)),
        );
        log::info!(
            "parsed {} members, {} classified and active",
            members.len(),
            tiers.len()
        );
        Ok(Directory {
            members,
            active_after: self.active_after,
            tiers,
        })
    }

    fn is_active(&self, member: &MemberClassificationRecord) -> bool {
        self.active_after
            .is_none_or(|cutoff| member.is_active_after(cutoff))
    }
}

/// Full member directory for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    members: Vec<MemberClassificationRecord>,
    active_after: Option<NaiveDate>,
    tiers: PriorityTiers,
}

impl Directory {
    /// Every member line, including unclassified and expired members.
    pub fn members(&self) -> &[MemberClassificationRecord] {
        &self.members
    }

    /// Disjoint priority tiers over active, classified members.
    pub const fn tiers(&self) -> &PriorityTiers {
        &self.tiers
    }

    /// Member numbers of the given tier.
    pub fn tier(&self, letter: ClassLetter) -> &[String] {
        self.tiers.get(letter)
    }

    /// Members holding any classification, regardless of expiration.
    pub fn classified_numbers(&self) -> Vec<&str> {
        self.members
            .iter()
            .filter(|member| member.is_classified())
            .map(|member| member.member_number.as_str())
            .collect()
    }

    /// Active members classified in `division`.
    pub fn division_members(&self, division: Division) -> Vec<&str> {
        self.active_members()
            .filter(|member| member.classifications.get(division).is_some())
            .map(|member| member.member_number.as_str())
            .collect()
    }

    /// Number of active members classified in each division.
    pub fn division_stats(&self) -> BTreeMap<Division, usize> {
        Division::ALL
            .into_iter()
            .map(|division| (division, self.division_members(division).len()))
            .collect()
    }

    /// Lookup from upstream member id to member number.
    ///
    /// Later lines win when an id repeats.
    pub fn member_id_index(&self) -> BTreeMap<&str, &str> {
        self.members
            .iter()
            .filter_map(|member| {
                member
                    .member_id
                    .as_deref()
                    .map(|id| (id, member.member_number.as_str()))
            })
            .collect()
    }

    fn active_members(&self) -> impl Iterator<Item = &MemberClassificationRecord> + '_ {
        self.members.iter().filter(|member| {
            self.active_after
                .is_none_or(|cutoff| member.is_active_after(cutoff))
        })
    }
}

#[cfg(test)]
mod tests;
