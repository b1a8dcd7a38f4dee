//! Test helpers for staging snapshot, HHF and payload files.

use crate::analyze::AnalyzeConfig;
use crate::directory::DirectoryConfig;
use crate::fetch::FetchConfig;
use crate::hydrate::HydrateConfig;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use hitfactor_core::ResolutionPolicy;
use hitfactor_data::fetch::{FetchOptions, RetryPolicy};
use hitfactor_data::upstream::UpstreamConfig;
use hitfactor_data::upstream::test_support::StubApi;
use hitfactor_data::upstream::{Endpoint, Operation};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

pub(super) const SNAPSHOT: &str = "\
$SNAPSHOT 2024-04-02
$FIELDS USPSA,PersonNumber,Expires,OPEN,PRODUCTION,CARRYOPTICS
TY100,900,2030-01-01,GM,B,
TY101,901,2030-01-01,,A,M
TY102,902,2020-01-01,C,,
TY103,903,2030-01-01,U,,
";

pub(super) const HHF_TABLE: &str = r#"[
    {"division": "prod", "classifier": "99-01", "hhf": 100.0},
    {"division": "prod", "classifier": "99-01", "hhf": 80.0, "effectiveFrom": "2024-06-01"},
    {"division": "co", "classifier": "09-14", "hhf": 12.5}
]"#;

pub(super) const RECOMMENDED: &str = r#"[
    {"division": "prod", "classifier": "99-01", "recHHF": 90.0}
]"#;

/// Temporary directory tree holding the inputs and outputs of one run.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Classifier history with one club score and one major-match score.
pub(super) fn classifier_history(member_number: &str, hit_factor: f64) -> Value {
    json!({
        "member_data": {"member_number": member_number, "member_id": "1"},
        "classifiers": [{
            "division_id": 5,
            "division_classifiers": [
                {"code": "B", "source": "Club", "hf": hit_factor.to_string(), "percent": "50",
                 "sd": "1/15/24", "clubid": "CLB1", "club_name": "Club One", "classifier": "99-01"},
                {"code": "B", "source": "Major Match", "hf": "7.2", "percent": 96.0,
                 "sd": "7/15/24", "clubid": "NAT", "club_name": "Nationals", "classifier": "99-01"}
            ]
        }]
    })
}

/// Stub API serving [`classifier_history`] for the snapshot's active members.
pub(super) fn stub_api() -> StubApi {
    [("TY100", 100.0), ("TY101", 45.0)]
        .into_iter()
        .fold(StubApi::new(), |api, (member, hit_factor)| {
            api.with_payload(
                &Endpoint::member(Operation::Classifiers, member),
                classifier_history(member, hit_factor),
            )
        })
}

/// Workspace holding the snapshot and both HHF tables.
pub(super) fn staged_workspace() -> Workspace {
    let workspace = Workspace::new();
    workspace.write("snapshot.txt", SNAPSHOT);
    workspace.write("hhf.json", HHF_TABLE);
    workspace.write("recommended.json", RECOMMENDED);
    workspace
}

pub(super) fn directory_config(workspace: &Workspace) -> DirectoryConfig {
    DirectoryConfig {
        snapshot: workspace.path("snapshot.txt"),
        meta_dir: workspace.path("meta"),
        active_after: NaiveDate::from_ymd_opt(2024, 3, 31),
    }
}

pub(super) fn fetch_config(workspace: &Workspace) -> FetchConfig {
    FetchConfig {
        meta_dir: workspace.path("meta"),
        imported_dir: workspace.path("imported"),
        reference_dir: None,
        api_keys: vec!["unused".to_owned()],
        upstream: UpstreamConfig::default(),
        retry: RetryPolicy::default().without_jitter(),
        options: FetchOptions::default(),
    }
}

pub(super) fn hydrate_config(workspace: &Workspace) -> HydrateConfig {
    HydrateConfig {
        imported_dir: workspace.path("imported"),
        hhf_table: workspace.path("hhf.json"),
        store: workspace.path("scores.db"),
        blacklist: None,
        recommended: Some(workspace.path("recommended.json")),
        resolution: ResolutionPolicy::PointInTime,
    }
}

pub(super) fn analyze_config(workspace: &Workspace) -> AnalyzeConfig {
    AnalyzeConfig {
        store: workspace.path("scores.db"),
        hhf_table: workspace.path("hhf.json"),
        recommended: Some(workspace.path("recommended.json")),
        out_dir: workspace.path("public"),
    }
}
