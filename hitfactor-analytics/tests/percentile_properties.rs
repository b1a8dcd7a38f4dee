//! Property-based tests for inverse percentiles and aggregation.
//!
//! # Invariants tested
//!
//! - **Range:** every defined fraction lies in `[0, 1]`.
//! - **Monotonicity:** raising the threshold never raises the fraction.
//! - **Sentinel exclusion:** sentinel values never change the result.
//! - **Major equality:** major-match rows report identical current and
//!   recommended percentiles.

use hitfactor_analytics::{THRESHOLDS, aggregate, inverse_percentile};
use hitfactor_core::test_support::major_score;
use hitfactor_core::{Division, HhfTable, PERCENT_SENTINEL, RecommendedHhf, RecommendedHhfTable};
use proptest::prelude::*;

fn percents() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            4 => 0.0_f64..=150.0_f64,
            1 => Just(PERCENT_SENTINEL),
        ],
        0..64,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: defined fractions stay within the unit interval.
    #[test]
    fn fractions_are_bounded(values in percents(), threshold in 0.0_f64..=150.0_f64) {
        if let Some(fraction) = inverse_percentile(&values, threshold) {
            prop_assert!((0.0..=1.0).contains(&fraction), "fraction {fraction} out of range");
        }
    }

    /// Property: the reported thresholds yield non-increasing fractions.
    #[test]
    fn fractions_do_not_increase_with_threshold(values in percents()) {
        let fractions: Vec<Option<f64>> = THRESHOLDS
            .iter()
            .rev()
            .map(|threshold| inverse_percentile(&values, *threshold))
            .collect();
        for pair in fractions.windows(2) {
            if let [Some(lower), Some(higher)] = pair {
                prop_assert!(higher <= lower, "{higher} > {lower} for {values:?}");
            }
        }
    }

    /// Property: appending sentinels leaves the result unchanged.
    #[test]
    fn sentinels_are_ignored(values in percents(), extra in 0_usize..8, threshold in 0.0_f64..=150.0_f64) {
        let mut padded = values.clone();
        padded.extend(std::iter::repeat_n(PERCENT_SENTINEL, extra));
        prop_assert_eq!(
            inverse_percentile(&values, threshold),
            inverse_percentile(&padded, threshold)
        );
    }

    /// Property: major-match percents ignore every HHF, recommended or not.
    #[test]
    fn major_rows_report_equal_percentiles(
        reported in prop::collection::vec(0.5_f64..=120.0_f64, 1..16),
        rec_hhf in 1.0_f64..=200.0_f64,
    ) {
        let records: Vec<_> = reported
            .iter()
            .map(|percent| major_score(Division::Limited, "09-14", *percent))
            .collect();
        let recommended = RecommendedHhfTable::from_entries([RecommendedHhf {
            division: Division::Limited,
            classifier: "09-14".to_owned(),
            rec_hhf,
        }])
        .unwrap_or_else(|err| panic!("positive recommended HHF is valid: {err}"));

        let rows = aggregate(&records, &HhfTable::default(), &recommended);
        prop_assert_eq!(rows.len(), 1);
        for row in &rows {
            prop_assert_eq!(row.cur_percentiles(), row.rec_percentiles());
            prop_assert_eq!(row.runs, reported.len());
        }
    }
}
