//! End-to-end runs of the directory, fetch, hydrate and analyze commands.

use super::helpers::{
    Workspace, analyze_config, directory_config, fetch_config, hydrate_config, staged_workspace,
    stub_api,
};
use super::*;
use crate::analyze::execute_analyze;
use crate::directory::{DirectoryConfig, execute_directory};
use crate::fetch::execute_fetch;
use crate::hydrate::execute_hydrate;
use hitfactor_analytics::ClassifierAnalytics;
use hitfactor_core::Division;
use rstest::{fixture, rstest};

#[fixture]
fn workspace() -> Workspace {
    staged_workspace()
}

#[rstest]
fn directory_writes_meta_and_reports_tiers(workspace: Workspace) {
    let summary = execute_directory(&directory_config(&workspace)).expect("directory runs");

    assert_eq!(summary.members, 4);
    assert_eq!(summary.classified, 3);
    assert_eq!(summary.tiers.get("gm"), Some(&1));
    assert_eq!(summary.tiers.get("m"), Some(&1));
    assert_eq!(summary.tiers.get("c"), Some(&0));
    assert_eq!(summary.divisions.get("prod"), Some(&2));
    assert!(workspace.path("meta/classified.gm.json").is_file());
    assert!(summary.files.iter().any(|name| name == "memberIdToNumber.json"));
}

#[rstest]
fn directory_reports_unreadable_snapshot(workspace: Workspace) {
    let config = DirectoryConfig {
        snapshot: workspace.path("missing.txt"),
        ..directory_config(&workspace)
    };
    match execute_directory(&config).expect_err("missing snapshot should error") {
        CliError::ReadInput { field, .. } => assert_eq!(field, ARG_SNAPSHOT),
        other => panic!("expected ReadInput, found {other:?}"),
    }
}

#[rstest]
fn fetch_requires_directory_meta(workspace: Workspace) {
    let api = stub_api();
    let err = execute_fetch(&fetch_config(&workspace), &api).expect_err("no meta yet");
    assert!(
        matches!(&err, CliError::PrepareDirectory { field, .. } if *field == ARG_META_DIR),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn full_pipeline_publishes_analytics(workspace: Workspace) {
    execute_directory(&directory_config(&workspace)).expect("directory runs");

    let api = stub_api();
    let fetched = execute_fetch(&fetch_config(&workspace), &api).expect("fetch runs");
    assert_eq!(fetched.slices_written, 4);
    assert!(fetched.failed_members.is_empty());
    assert!(workspace.path("imported/classifiers.gm.1.json").is_file());
    assert!(workspace.path("imported/classification.m.1.json").is_file());

    let hydrated = execute_hydrate(&hydrate_config(&workspace)).expect("hydrate runs");
    assert_eq!(hydrated.hydration.files_read, 2);
    assert_eq!(hydrated.hydration.records_written, 4);
    assert_eq!(hydrated.recommended_applied, Some(4));

    let analyzed = execute_analyze(&analyze_config(&workspace)).expect("analyze runs");
    assert_eq!(analyzed.records, 4);
    assert_eq!(analyzed.rows, 2);

    let bytes = std::fs::read(analyzed.output.as_std_path()).expect("read analytics");
    let rows: Vec<ClassifierAnalytics> = serde_json::from_slice(&bytes).expect("decode analytics");
    let production = rows
        .iter()
        .find(|row| row.division == Division::Production)
        .expect("production row");
    assert_eq!(production.runs, 4);
    assert_eq!(production.hhf, Some(80.0));
    assert_eq!(production.prev_hhf, Some(100.0));
    assert_eq!(production.rec_hhf, Some(90.0));
    assert_eq!(production.rec_hhf_change_percent, Some(12.5));
    assert_eq!(production.inverse_100_cur_percent_percentile, Some(0.25));
    assert_eq!(production.inverse_95_cur_percent_percentile, Some(0.75));
    assert_eq!(production.inverse_95_rec_percent_percentile, Some(0.75));

    let carry_optics = rows
        .iter()
        .find(|row| row.division == Division::CarryOptics)
        .expect("carry optics row");
    assert_eq!(carry_optics.runs, 0);
    assert_eq!(carry_optics.inverse_75_cur_percent_percentile, None);
}

#[rstest]
fn hydrate_rerun_replaces_records(workspace: Workspace) {
    execute_directory(&directory_config(&workspace)).expect("directory runs");
    execute_fetch(&fetch_config(&workspace), &stub_api()).expect("fetch runs");

    let first = execute_hydrate(&hydrate_config(&workspace)).expect("first hydrate");
    let second = execute_hydrate(&hydrate_config(&workspace)).expect("second hydrate");
    assert_eq!(first.hydration, second.hydration);

    let analyzed = execute_analyze(&analyze_config(&workspace)).expect("analyze runs");
    assert_eq!(analyzed.records, 4);
}

#[rstest]
fn summaries_are_written_as_json(workspace: Workspace) {
    let summary = execute_directory(&directory_config(&workspace)).expect("directory runs");
    let mut buffer = Vec::new();
    write_summary(&mut buffer, &summary).expect("write summary");

    let value: serde_json::Value = serde_json::from_slice(&buffer).expect("summary json");
    assert_eq!(value.get("members"), Some(&serde_json::json!(4)));
    assert!(buffer.ends_with(b"\n"));
}
