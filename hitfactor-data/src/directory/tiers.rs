//! Disjoint priority tiers used to schedule re-fetches.

use std::collections::{BTreeMap, HashMap};

use hitfactor_core::{ClassLetter, MemberClassificationRecord};

/// Member numbers partitioned by their highest classification letter.
///
/// Each classified member appears in exactly one tier. Within a tier, members
/// keep the order in which they first appear in the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityTiers {
    tiers: BTreeMap<ClassLetter, Vec<String>>,
}

impl PriorityTiers {
    /// Partition `members` by the highest letter held in any division.
    ///
    /// Repeated member numbers are merged and claimed by the highest tier
    /// any of their lines qualifies for.
    pub fn partition<'a>(members: impl IntoIterator<Item = &'a MemberClassificationRecord>) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut highest: HashMap<&str, ClassLetter> = HashMap::new();
        for member in members {
            let Some(letter) = member.highest_classification() else {
                continue;
            };
            let number = member.member_number.as_str();
            highest
                .entry(number)
                .and_modify(|current| *current = (*current).min(letter))
                .or_insert_with(|| {
                    order.push(number);
                    letter
                });
        }

        let mut tiers: BTreeMap<ClassLetter, Vec<String>> = BTreeMap::new();
        for number in order {
            if let Some(letter) = highest.get(number) {
                tiers.entry(*letter).or_default().push(number.to_owned());
            }
        }
        Self { tiers }
    }

    /// Rebuild tiers from per-letter lists previously written to disk.
    pub(super) fn from_lists(lists: impl IntoIterator<Item = (ClassLetter, Vec<String>)>) -> Self {
        Self {
            tiers: lists
                .into_iter()
                .filter(|(_, members)| !members.is_empty())
                .collect(),
        }
    }

    /// Member numbers claimed by `letter`.
    pub fn get(&self, letter: ClassLetter) -> &[String] {
        self.tiers.get(&letter).map_or(&[], Vec::as_slice)
    }

    /// Every tier, highest precedence first, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (ClassLetter, &[String])> + '_ {
        ClassLetter::ALL
            .into_iter()
            .map(|letter| (letter, self.get(letter)))
    }

    /// Total number of members across all tiers.
    pub fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    /// Whether no member holds a classification.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
