//! Builders for score records used by unit and behaviour tests.

use crate::{Division, MAJOR_MATCH_SOURCE, ResolvedHhf, ScoreRecord, parse_upstream_date};

/// Ordinary club score for `classifier` in `division` with the given hit
/// factor and current HHF.
#[must_use]
pub fn club_score(
    division: Division,
    classifier: &str,
    hit_factor: Option<f64>,
    hhf: ResolvedHhf,
) -> ScoreRecord {
    let sd = "1/15/24".to_owned();
    ScoreRecord {
        classifier: classifier.to_owned(),
        shot_date: parse_upstream_date(&sd),
        sd,
        club_id: "TST01".to_owned(),
        club_name: "Test Club".to_owned(),
        percent: None,
        hit_factor,
        code: None,
        source: "Club".to_owned(),
        member_number: "TEST1".to_owned(),
        division,
        hhf,
        rec_hhf: ResolvedHhf::Unknown,
    }
}

/// Major-match score carrying an authoritative percent.
#[must_use]
pub fn major_score(division: Division, classifier: &str, percent: f64) -> ScoreRecord {
    ScoreRecord {
        percent: Some(percent),
        source: MAJOR_MATCH_SOURCE.to_owned(),
        ..club_score(division, classifier, None, ResolvedHhf::NotApplicable)
    }
}
