//! Behavioural tests for classifier analytics aggregation.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, fs, path::PathBuf};

use hitfactor_analytics::{ClassifierAnalytics, InversePercentiles, aggregate, inverse_percentile};
use hitfactor_core::test_support::{club_score, major_score};
use hitfactor_core::{
    Division, HhfRevision, HhfTable, RecommendedHhf, RecommendedHhfTable, ResolvedHhf, ScoreRecord,
};

#[fixture]
fn score_records() -> RefCell<Vec<ScoreRecord>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn hhf_table() -> RefCell<HhfTable> {
    RefCell::new(HhfTable::default())
}

#[fixture]
fn recommended_table() -> RefCell<RecommendedHhfTable> {
    RefCell::new(RecommendedHhfTable::default())
}

#[fixture]
fn analytics_rows() -> RefCell<Option<Vec<ClassifierAnalytics>>> {
    RefCell::new(None)
}

fn row_for(
    rows: &RefCell<Option<Vec<ClassifierAnalytics>>>,
    classifier: &str,
) -> ClassifierAnalytics {
    rows.borrow()
        .as_ref()
        .unwrap_or_else(|| panic!("analytics were aggregated"))
        .iter()
        .find(|row| row.classifier == classifier)
        .cloned()
        .unwrap_or_else(|| panic!("no analytics row for {classifier}"))
}

#[given("production runs on 99-01 with hit factors 10 and 9 against an HHF of 100")]
fn club_runs(#[from(score_records)] records: &RefCell<Vec<ScoreRecord>>) {
    records.borrow_mut().extend([10.0, 9.0].map(|hit_factor| {
        club_score(
            Division::Production,
            "99-01",
            Some(hit_factor),
            ResolvedHhf::Known(100.0),
        )
    }));
}

#[given("an HHF table that lists production classifier 99-02")]
fn listed_classifier(#[from(hhf_table)] table: &RefCell<HhfTable>) {
    let revision = HhfRevision {
        division: Division::Production,
        classifier: "99-02".to_owned(),
        hhf: 7.5,
        effective_from: None,
    };
    *table.borrow_mut() = HhfTable::from_revisions([revision])
        .unwrap_or_else(|err| panic!("single revision is valid: {err}"));
}

#[given("major match runs on 99-01 at 96 and 80 percent")]
fn major_runs(#[from(score_records)] records: &RefCell<Vec<ScoreRecord>>) {
    records
        .borrow_mut()
        .extend([96.0, 80.0].map(|percent| major_score(Division::Production, "99-01", percent)));
}

#[given("a recommended HHF of 120 for 99-01")]
fn recommended_value(#[from(recommended_table)] table: &RefCell<RecommendedHhfTable>) {
    let entry = RecommendedHhf {
        division: Division::Production,
        classifier: "99-01".to_owned(),
        rec_hhf: 120.0,
    };
    *table.borrow_mut() = RecommendedHhfTable::from_entries([entry])
        .unwrap_or_else(|err| panic!("positive recommendation is valid: {err}"));
}

#[when("the analytics are aggregated")]
fn aggregate_rows(
    #[from(score_records)] records: &RefCell<Vec<ScoreRecord>>,
    #[from(hhf_table)] hhfs: &RefCell<HhfTable>,
    #[from(recommended_table)] recommended: &RefCell<RecommendedHhfTable>,
    #[from(analytics_rows)] rows: &RefCell<Option<Vec<ClassifierAnalytics>>>,
) {
    let computed = aggregate(&records.borrow(), &hhfs.borrow(), &recommended.borrow());
    *rows.borrow_mut() = Some(computed);
}

#[then("the 99-01 row reports 2 runs")]
fn two_runs(#[from(analytics_rows)] rows: &RefCell<Option<Vec<ClassifierAnalytics>>>) {
    assert_eq!(row_for(rows, "99-01").runs, 2);
}

#[then("half of the 99-01 current percents are at or above 9.5")]
fn half_above(
    #[from(score_records)] records: &RefCell<Vec<ScoreRecord>>,
    #[from(analytics_rows)] rows: &RefCell<Option<Vec<ClassifierAnalytics>>>,
) {
    let percents: Vec<f64> = records
        .borrow()
        .iter()
        .filter(|record| record.division == Division::Production && record.classifier == "99-01")
        .map(ScoreRecord::cur_percent)
        .collect();
    assert_eq!(percents.len(), row_for(rows, "99-01").runs);
    assert_eq!(inverse_percentile(&percents, 9.5), Some(0.5));
}

#[then("the 99-02 row reports 0 runs")]
fn no_runs(#[from(analytics_rows)] rows: &RefCell<Option<Vec<ClassifierAnalytics>>>) {
    assert_eq!(row_for(rows, "99-02").runs, 0);
}

#[then("the 99-02 row has no defined percentiles")]
fn undefined_percentiles(#[from(analytics_rows)] rows: &RefCell<Option<Vec<ClassifierAnalytics>>>) {
    let row = row_for(rows, "99-02");
    assert_eq!(row.cur_percentiles(), InversePercentiles::default());
    assert_eq!(row.rec_percentiles(), InversePercentiles::default());
    assert_eq!(row.hhf, Some(7.5));
}

#[then("the 99-01 current and recommended percentiles are equal")]
fn equal_percentiles(#[from(analytics_rows)] rows: &RefCell<Option<Vec<ClassifierAnalytics>>>) {
    let row = row_for(rows, "99-01");
    assert_eq!(row.cur_percentiles(), row.rec_percentiles());
    assert_eq!(row.inverse_95_cur_percent_percentile, Some(0.5));
    assert_eq!(row.rec_hhf, Some(120.0));
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/aggregation.feature");
    let contents = fs::read_to_string(&feature).unwrap_or_else(|err| {
        panic!("failed to read feature file {feature:?}: {err}");
    });
    let titles: Vec<String> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .map(str::to_owned)
        .collect();
    let expected = [
        "reporting the share of runs above a threshold",
        "leaving percentiles undefined for classifiers without runs",
        "reporting major match percents unchanged",
    ];
    assert_eq!(
        titles.len(),
        expected.len(),
        "scenario count changed in feature file: {titles:?}"
    );
    for (index, expected_title) in expected.iter().enumerate() {
        assert_eq!(
            titles.get(index).map(String::as_str),
            Some(*expected_title),
            "scenario at index {index} does not match feature order"
        );
    }
}

#[scenario(path = "tests/features/aggregation.feature", index = 0)]
fn reporting_threshold_share(
    score_records: RefCell<Vec<ScoreRecord>>,
    hhf_table: RefCell<HhfTable>,
    recommended_table: RefCell<RecommendedHhfTable>,
    analytics_rows: RefCell<Option<Vec<ClassifierAnalytics>>>,
) {
    let _ = (score_records, hhf_table, recommended_table, analytics_rows);
}

#[scenario(path = "tests/features/aggregation.feature", index = 1)]
fn undefined_for_empty_classifiers(
    score_records: RefCell<Vec<ScoreRecord>>,
    hhf_table: RefCell<HhfTable>,
    recommended_table: RefCell<RecommendedHhfTable>,
    analytics_rows: RefCell<Option<Vec<ClassifierAnalytics>>>,
) {
    let _ = (score_records, hhf_table, recommended_table, analytics_rows);
}

#[scenario(path = "tests/features/aggregation.feature", index = 2)]
fn majors_report_unchanged(
    score_records: RefCell<Vec<ScoreRecord>>,
    hhf_table: RefCell<HhfTable>,
    recommended_table: RefCell<RecommendedHhfTable>,
    analytics_rows: RefCell<Option<Vec<ClassifierAnalytics>>>,
) {
    let _ = (score_records, hhf_table, recommended_table, analytics_rows);
}
