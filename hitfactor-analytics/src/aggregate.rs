//! Grouping of score records into per-classifier analytics rows.

use std::collections::BTreeMap;

use hitfactor_core::{Division, HhfTable, RecommendedHhfTable, ResolvedHhf, ScoreRecord};

use crate::{ClassifierAnalytics, InversePercentiles};

type PairKey = (Division, String);

/// Compute one row per `(division, classifier)` pair.
///
/// Pairs come from the records and from `hhfs`, so a classifier with no runs
/// still gets a row with undefined percentiles. Rows are sorted by division,
/// then classifier code. Current percents use each record's resolved HHF;
/// recommended percents use `recommended`, falling back to the record's own
/// recommended HHF when the table has no entry.
#[must_use]
pub fn aggregate(
    records: &[ScoreRecord],
    hhfs: &HhfTable,
    recommended: &RecommendedHhfTable,
) -> Vec<ClassifierAnalytics> {
    let mut groups: BTreeMap<PairKey, Vec<&ScoreRecord>> = hhfs
        .pairs()
        .map(|(division, classifier)| ((division, classifier.to_owned()), Vec::new()))
        .collect();
    for record in records {
        groups
            .entry((record.division, record.classifier.clone()))
            .or_default()
            .push(record);
    }

    let rows: Vec<ClassifierAnalytics> = groups
        .into_iter()
        .map(|((division, classifier), group)| {
            summarise(division, classifier, &group, hhfs, recommended)
        })
        .collect();
    log::info!(
        "aggregated {} records into {} classifier rows",
        records.len(),
        rows.len()
    );
    rows
}

fn summarise(
    division: Division,
    classifier: String,
    group: &[&ScoreRecord],
    hhfs: &HhfTable,
    recommended: &RecommendedHhfTable,
) -> ClassifierAnalytics {
    let hhf = hhfs.latest(division, &classifier);
    let rec_hhf = recommended.get(division, &classifier);

    let cur_percents: Vec<f64> = group.iter().map(|record| record.cur_percent()).collect();
    let rec_percents: Vec<f64> = group
        .iter()
        .map(|record| {
            record.percent_against(rec_hhf.map_or(record.rec_hhf, ResolvedHhf::Known))
        })
        .collect();
    let cur = InversePercentiles::over(&cur_percents);
    let rec = InversePercentiles::over(&rec_percents);
    let (rec_hhf_change, rec_hhf_change_percent) = change(hhf, rec_hhf);

    ClassifierAnalytics {
        division,
        prev_hhf: hhfs.previous(division, &classifier),
        classifier,
        hhf,
        rec_hhf,
        runs: group.len(),
        rec_hhf_change,
        rec_hhf_change_percent,
        inverse_100_cur_percent_percentile: cur.p100,
        inverse_95_cur_percent_percentile: cur.p95,
        inverse_85_cur_percent_percentile: cur.p85,
        inverse_75_cur_percent_percentile: cur.p75,
        inverse_100_rec_percent_percentile: rec.p100,
        inverse_95_rec_percent_percentile: rec.p95,
        inverse_85_rec_percent_percentile: rec.p85,
        inverse_75_rec_percent_percentile: rec.p75,
    }
}

/// Absolute and relative change from the current to the recommended HHF.
///
/// Both are undefined unless the current HHF is positive and a recommended
/// HHF is known.
#[expect(
    clippy::float_arithmetic,
    reason = "HHF deltas are floating-point differences and ratios"
)]
const fn change(current: Option<f64>, recommended: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (current, recommended) {
        (Some(hhf), Some(rec)) if hhf > 0.0 && hhf.is_finite() => {
            (Some(rec - hhf), Some(100.0 * (rec / hhf - 1.0)))
        }
        _ => (None, None),
    }
}
