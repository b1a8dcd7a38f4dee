use hitfactor_core::{
    Division, HhfResolver, LEGACY_SOURCE, MAJOR_MATCH_SOURCE, RecommendedHhfTable, ResolvedHhf,
    ScoreRecord, parse_upstream_date,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Blacklist;
use super::payload::{ClassifiersPayload, DivisionHistory, RawEntry, json_number, json_text, json_u32};

/// Counters reported by a hydration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationSummary {
    /// Batch files read.
    pub files_read: usize,
    /// Fulfilled member payloads read.
    pub members_read: usize,
    /// Failed settled entries skipped.
    pub failed_members: usize,
    /// Payloads that did not have the classifier-history shape.
    pub malformed_payloads: usize,
    /// Entries under an unmapped division id.
    pub unknown_division_entries: usize,
    /// Entries dropped for a `Legacy` source.
    pub legacy_dropped: usize,
    /// Entries dropped by the blacklist.
    pub blacklisted_dropped: usize,
    /// Entries whose hit factor was present but not numeric.
    pub unparseable_hit_factors: usize,
    /// Non-major entries without an HHF revision.
    pub unknown_hhfs: usize,
    /// Records handed to the store.
    pub records_written: usize,
}

/// Converts classifier-history payloads into [`ScoreRecord`]s.
pub struct Normalizer<'a> {
    resolver: &'a dyn HhfResolver,
    blacklist: &'a Blacklist,
}

impl<'a> Normalizer<'a> {
    /// Normaliser resolving current HHFs through `resolver`.
    pub fn new(resolver: &'a dyn HhfResolver, blacklist: &'a Blacklist) -> Self {
        Self {
            resolver,
            blacklist,
        }
    }

    /// Normalise one member payload.
    ///
    /// `fallback_member` is used when the payload omits its member number.
    pub fn normalize(
        &self,
        fallback_member: &str,
        payload: &Value,
        summary: &mut HydrationSummary,
    ) -> Vec<ScoreRecord> {
        let Ok(payload) = ClassifiersPayload::deserialize(payload) else {
            log::warn!("skipping malformed classifier payload for {fallback_member}");
            summary.malformed_payloads += 1;
            return Vec::new();
        };
        let mut member_number = json_text(&payload.member_data.member_number);
        if member_number.is_empty() {
            fallback_member.clone_into(&mut member_number);
        }
        let member_id = json_text(&payload.member_data.member_id);
        let member = MemberKey {
            number: &member_number,
            id: &member_id,
        };

        payload
            .classifiers
            .iter()
            .flat_map(|history| self.normalize_division(&member, history, summary))
            .collect()
    }

    fn normalize_division(
        &self,
        member: &MemberKey<'_>,
        history: &DivisionHistory,
        summary: &mut HydrationSummary,
    ) -> Vec<ScoreRecord> {
        let Some(division) = json_u32(&history.division_id).and_then(Division::from_upstream_id)
        else {
            summary.unknown_division_entries += history.division_classifiers.len();
            return Vec::new();
        };
        history
            .division_classifiers
            .iter()
            .filter_map(|entry| self.normalize_entry(member, division, entry, summary))
            .collect()
    }

    fn normalize_entry(
        &self,
        member: &MemberKey<'_>,
        division: Division,
        entry: &RawEntry,
        summary: &mut HydrationSummary,
    ) -> Option<ScoreRecord> {
        let source = json_text(&entry.source);
        if source == LEGACY_SOURCE {
            summary.legacy_dropped += 1;
            return None;
        }
        let key = Blacklist::key_for_values(
            member.id,
            &entry.classifier,
            &entry.sd,
            &entry.clubid,
            &entry.hf,
        );
        if self.blacklist.contains(&key) {
            log::debug!("dropping blacklisted record {key}");
            summary.blacklisted_dropped += 1;
            return None;
        }

        let classifier = json_text(&entry.classifier);
        let sd = json_text(&entry.sd);
        let shot_date = parse_upstream_date(&sd);
        let hit_factor = json_number(&entry.hf);
        if hit_factor.is_none() && !entry.hf.is_null() {
            summary.unparseable_hit_factors += 1;
        }
        let hhf = if source == MAJOR_MATCH_SOURCE {
            ResolvedHhf::NotApplicable
        } else {
            self.resolver.resolve(division, &classifier, shot_date)
        };
        if hhf.is_unknown() {
            summary.unknown_hhfs += 1;
        }
        let code = json_text(&entry.code);

        Some(ScoreRecord {
            classifier,
            sd,
            shot_date,
            club_id: json_text(&entry.clubid),
            club_name: json_text(&entry.club_name),
            percent: json_number(&entry.percent),
            hit_factor,
            code: (!code.is_empty()).then_some(code),
            source,
            member_number: member.number.to_owned(),
            division,
            hhf,
            rec_hhf: ResolvedHhf::Unknown,
        })
    }
}

struct MemberKey<'a> {
    number: &'a str,
    id: &'a str,
}

/// Fill `rec_hhf` on every record from `table`.
///
/// Returns the number of records that received a recommendation.
pub fn apply_recommended_hhfs(records: &mut [ScoreRecord], table: &RecommendedHhfTable) -> usize {
    let mut applied = 0;
    for record in records {
        record.rec_hhf = table
            .get(record.division, &record.classifier)
            .map_or(ResolvedHhf::Unknown, ResolvedHhf::Known);
        if matches!(record.rec_hhf, ResolvedHhf::Known(_)) {
            applied += 1;
        }
    }
    applied
}
