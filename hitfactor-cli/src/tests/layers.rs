//! Configuration layering tests built on `ortho_config`'s merge composer.

use super::*;
use crate::fetch::{FetchArgs, FetchConfig};
use crate::hydrate::{HydrateArgs, HydrateConfig};
use camino::Utf8PathBuf;
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::json;

fn fetch_config(composer: MergeComposer) -> Result<FetchConfig, CliError> {
    let merged = FetchArgs::merge_from_layers(composer.layers()).map_err(CliError::from)?;
    FetchConfig::try_from(merged)
}

#[rstest]
fn invalid_layers_map_to_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "slice_size": "many" }));

    match fetch_config(composer).expect_err("invalid layer should error") {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn cli_flags_override_environment_and_files() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "meta_dir": "from-file/meta",
            "imported_dir": "from-file/imported",
            "api_keys": "file-key",
            "slice_size": 64,
        }),
        None,
    );
    composer.push_environment(json!({
        "imported_dir": "from-env/imported",
        "api_keys": "env-key-1,env-key-2",
    }));
    composer.push_cli(json!({ "slice_size": 16 }));

    let config = fetch_config(composer).expect("merged config should build");
    assert_eq!(config.meta_dir, Utf8PathBuf::from("from-file/meta"));
    assert_eq!(config.imported_dir, Utf8PathBuf::from("from-env/imported"));
    assert_eq!(config.api_keys, ["env-key-1", "env-key-2"]);
    assert_eq!(config.options.slice_size(), 16);
}

#[rstest]
fn environment_supplies_hydration_policy() {
    let mut composer = MergeComposer::new();
    composer.push_environment(json!({
        "imported_dir": "imported",
        "hhf_table": "hhf.json",
        "store": "scores.db",
        "resolution": "latest-only",
    }));

    let merged = HydrateArgs::merge_from_layers(composer.layers()).expect("layers merge");
    let config = HydrateConfig::try_from(merged).expect("config should build");
    assert_eq!(config.resolution, hitfactor_core::ResolutionPolicy::LatestOnly);
    assert_eq!(config.blacklist, None);
}
