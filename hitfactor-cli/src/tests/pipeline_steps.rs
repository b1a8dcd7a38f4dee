//! Behavioural coverage for the command pipeline.

use super::helpers::{
    Workspace, analyze_config, directory_config, fetch_config, hydrate_config, staged_workspace,
    stub_api,
};
use super::*;
use crate::analyze::{AnalyzeSummary, execute_analyze};
use crate::directory::execute_directory;
use crate::fetch::{FetchSummary, execute_fetch};
use crate::hydrate::execute_hydrate;
use hitfactor_analytics::ClassifierAnalytics;
use hitfactor_core::Division;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug)]
struct PipelineWorld {
    workspace: RefCell<Option<Workspace>>,
    analyzed: RefCell<Option<Result<AnalyzeSummary, CliError>>>,
    fetches: RefCell<Vec<Result<FetchSummary, CliError>>>,
}

impl PipelineWorld {
    fn new() -> Self {
        Self {
            workspace: RefCell::new(None),
            analyzed: RefCell::new(None),
            fetches: RefCell::new(Vec::new()),
        }
    }

    fn with_workspace<T>(&self, action: impl FnOnce(&Workspace) -> T) -> T {
        let workspace = self.workspace.borrow();
        action(workspace.as_ref().expect("workspace should be staged"))
    }

    fn rows(&self) -> Vec<ClassifierAnalytics> {
        let analyzed = self.analyzed.borrow();
        let summary = analyzed
            .as_ref()
            .expect("analyze should have run")
            .as_ref()
            .expect("analyze should succeed");
        let bytes = std::fs::read(summary.output.as_std_path()).expect("read analytics");
        serde_json::from_slice(&bytes).expect("decode analytics")
    }
}

#[fixture]
fn pipeline_world() -> PipelineWorld {
    PipelineWorld::new()
}

#[given("a classification snapshot and HHF tables")]
fn staged_inputs(#[from(pipeline_world)] world: &PipelineWorld) {
    world.workspace.replace(Some(staged_workspace()));
}

#[when("I run directory, fetch, hydrate and analyze in order")]
fn run_all_commands(#[from(pipeline_world)] world: &PipelineWorld) {
    let outcome = world.with_workspace(|workspace| {
        execute_directory(&directory_config(workspace))?;
        execute_fetch(&fetch_config(workspace), &stub_api())?;
        execute_hydrate(&hydrate_config(workspace))?;
        execute_analyze(&analyze_config(workspace))
    });
    world.analyzed.replace(Some(outcome));
}

#[when("I run fetch without building the directory")]
fn run_fetch_only(#[from(pipeline_world)] world: &PipelineWorld) {
    let outcome = world.with_workspace(|workspace| {
        execute_fetch(&fetch_config(workspace), &stub_api())
    });
    world.fetches.borrow_mut().push(outcome);
}

#[when("I run directory and fetch twice with resume enabled")]
fn run_fetch_twice(#[from(pipeline_world)] world: &PipelineWorld) {
    world.with_workspace(|workspace| {
        execute_directory(&directory_config(workspace)).expect("directory runs");
        let mut config = fetch_config(workspace);
        config.options = config.options.with_resume(true);
        let api = stub_api();
        let mut fetches = world.fetches.borrow_mut();
        fetches.push(execute_fetch(&config, &api));
        fetches.push(execute_fetch(&config, &api));
    });
}

#[then("analytics are published for every classifier with an HHF")]
fn analytics_published(#[from(pipeline_world)] world: &PipelineWorld) {
    let rows = world.rows();
    let pairs: Vec<(Division, &str)> = rows
        .iter()
        .map(|row| (row.division, row.classifier.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [(Division::Production, "99-01"), (Division::CarryOptics, "09-14")]
    );
}

#[then("the production classifier reports its recommended HHF change")]
fn recommended_change(#[from(pipeline_world)] world: &PipelineWorld) {
    let rows = world.rows();
    let production = rows
        .iter()
        .find(|row| row.division == Division::Production)
        .expect("production row");
    assert_eq!(production.rec_hhf, Some(90.0));
    assert_eq!(production.rec_hhf_change, Some(10.0));
    assert_eq!(production.rec_hhf_change_percent, Some(12.5));
}

#[then("the CLI reports that the meta directory is missing")]
fn reports_missing_meta(#[from(pipeline_world)] world: &PipelineWorld) {
    let fetches = world.fetches.borrow();
    let error = fetches
        .first()
        .expect("fetch should have run")
        .as_ref()
        .expect_err("fetch should fail");
    match error {
        CliError::PrepareDirectory { field, .. } => assert_eq!(*field, ARG_META_DIR),
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("the second fetch skips every batch file")]
fn second_fetch_skips(#[from(pipeline_world)] world: &PipelineWorld) {
    let fetches = world.fetches.borrow();
    let [first, second] = fetches.as_slice() else {
        panic!("expected two fetch runs, found {}", fetches.len());
    };
    let first = first.as_ref().expect("first fetch succeeds");
    let second = second.as_ref().expect("second fetch succeeds");
    assert_eq!(first.slices_written, 4);
    assert_eq!(second.slices_written, 0);
    assert_eq!(second.slices_skipped, 4);
    assert_eq!(second.members_requested, 0);
}

#[scenario(
    path = "tests/features/cli_pipeline.feature",
    name = "publishing analytics from a snapshot"
)]
fn publishing_analytics(#[from(pipeline_world)] world: PipelineWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cli_pipeline.feature",
    name = "fetching before the directory has been built"
)]
fn fetching_without_directory(#[from(pipeline_world)] world: PipelineWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/cli_pipeline.feature",
    name = "resuming a fetch keeps existing batches"
)]
fn resuming_fetch(#[from(pipeline_world)] world: PipelineWorld) {
    let _ = world;
}
