//! Property-based tests for priority tier partitioning.
//!
//! # Invariants tested
//!
//! - **Disjointness:** no member number appears in two tiers.
//! - **Coverage:** with no activity cutoff, the tiers cover exactly the
//!   classified members.
//! - **Highest letter:** each member sits in the tier of its best letter.

use std::collections::BTreeSet;

use hitfactor_core::ClassLetter;
use hitfactor_data::directory::DirectoryBuilder;
use proptest::prelude::*;

const LETTERS: [&str; 9] = ["", "GM", "M", "A", "B", "C", "D", "U", "X"];

fn snapshot_lines() -> impl Strategy<Value = Vec<[usize; 3]>> {
    prop::collection::vec(prop::array::uniform3(0..LETTERS.len()), 0..40)
}

fn render(lines: &[[usize; 3]]) -> String {
    let mut text = String::from("$FIELDS USPSA,PersonNumber,Expires,OPEN,LIMITED,PRODUCTION\n");
    for (index, columns) in lines.iter().enumerate() {
        let letters: Vec<&str> = columns
            .iter()
            .map(|column| LETTERS.get(*column).copied().unwrap_or_default())
            .collect();
        text.push_str(&format!(
            "M{index:03},{index},2030-01-01,{}\n",
            letters.join(",")
        ));
    }
    text
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: tiers are disjoint and jointly cover every classified member.
    #[test]
    fn tiers_partition_classified_members(lines in snapshot_lines()) {
        let directory = DirectoryBuilder::new()
            .build(&render(&lines))
            .expect("generated snapshot parses");

        let mut seen = BTreeSet::new();
        for (_, members) in directory.tiers().iter() {
            for member in members {
                prop_assert!(seen.insert(member.as_str()), "{member} appears twice");
            }
        }
        let classified: BTreeSet<&str> = directory.classified_numbers().into_iter().collect();
        prop_assert_eq!(seen, classified);
    }

    /// Property: a member's tier is the best letter on its line.
    #[test]
    fn members_land_in_their_best_tier(lines in snapshot_lines()) {
        let directory = DirectoryBuilder::new()
            .build(&render(&lines))
            .expect("generated snapshot parses");

        for member in directory.members() {
            let best = member.highest_classification();
            for letter in ClassLetter::ALL {
                let listed = directory
                    .tier(letter)
                    .iter()
                    .any(|number| *number == member.member_number);
                prop_assert_eq!(listed, best == Some(letter));
            }
        }
    }
}
