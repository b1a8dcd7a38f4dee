//! `hydrate` command: batch files in, score store out.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hitfactor_core::{HhfTable, RecommendedHhfTable, ResolutionPolicy};
use hitfactor_data::hydrate::{
    Blacklist, HydrationSummary, Normalizer, apply_recommended_to_store, hydrate_batches,
};
use hitfactor_data::store::SqliteScoreStore;
use hitfactor_fs::ArtifactDir;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BLACKLIST, ARG_HHF_TABLE, ARG_IMPORTED_DIR, ARG_RECOMMENDED, ARG_RESOLUTION, ARG_STORE,
    CliError, ENV_HYDRATE_HHF_TABLE, ENV_HYDRATE_IMPORTED_DIR, ENV_HYDRATE_STORE, read_input,
    write_summary,
};

/// CLI arguments for the `hydrate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read every classifiers batch file, resolve the HHF in force \
                 for each score and replace the contents of the score store \
                 with the normalised records.",
    about = "Normalise fetched batches into the score store"
)]
#[ortho_config(prefix = "HITFACTOR")]
pub(crate) struct HydrateArgs {
    /// Directory holding the batch files written by `fetch`.
    #[arg(long = ARG_IMPORTED_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) imported_dir: Option<Utf8PathBuf>,
    /// JSON array of HHF revisions.
    #[arg(long = ARG_HHF_TABLE, value_name = "path")]
    #[serde(default)]
    pub(crate) hhf_table: Option<Utf8PathBuf>,
    /// SQLite database receiving the score records.
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
    /// JSON array of extra blacklist keys.
    #[arg(long = ARG_BLACKLIST, value_name = "path")]
    #[serde(default)]
    pub(crate) blacklist: Option<Utf8PathBuf>,
    /// JSON array of recommended HHFs applied after hydration.
    #[arg(long = ARG_RECOMMENDED, value_name = "path")]
    #[serde(default)]
    pub(crate) recommended: Option<Utf8PathBuf>,
    /// `point-in-time` (default) or `latest-only`.
    #[arg(long = ARG_RESOLUTION, value_name = "policy")]
    #[serde(default)]
    pub(crate) resolution: Option<String>,
}

impl HydrateArgs {
    fn into_config(self) -> Result<HydrateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        HydrateConfig::try_from(merged)
    }
}

/// Resolved `hydrate` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HydrateConfig {
    pub(crate) imported_dir: Utf8PathBuf,
    pub(crate) hhf_table: Utf8PathBuf,
    pub(crate) store: Utf8PathBuf,
    pub(crate) blacklist: Option<Utf8PathBuf>,
    pub(crate) recommended: Option<Utf8PathBuf>,
    pub(crate) resolution: ResolutionPolicy,
}

impl TryFrom<HydrateArgs> for HydrateConfig {
    type Error = CliError;

    fn try_from(args: HydrateArgs) -> Result<Self, Self::Error> {
        let imported_dir = args.imported_dir.ok_or(CliError::MissingArgument {
            field: ARG_IMPORTED_DIR,
            env: ENV_HYDRATE_IMPORTED_DIR,
        })?;
        let hhf_table = args.hhf_table.ok_or(CliError::MissingArgument {
            field: ARG_HHF_TABLE,
            env: ENV_HYDRATE_HHF_TABLE,
        })?;
        let store = args.store.ok_or(CliError::MissingArgument {
            field: ARG_STORE,
            env: ENV_HYDRATE_STORE,
        })?;
        let resolution = args
            .resolution
            .map(parse_resolution)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            imported_dir,
            hhf_table,
            store,
            blacklist: args.blacklist,
            recommended: args.recommended,
            resolution,
        })
    }
}

fn parse_resolution(value: String) -> Result<ResolutionPolicy, CliError> {
    match value.as_str() {
        "point-in-time" => Ok(ResolutionPolicy::PointInTime),
        "latest-only" => Ok(ResolutionPolicy::LatestOnly),
        _ => Err(CliError::InvalidArgument {
            field: ARG_RESOLUTION,
            value,
            expected: "point-in-time or latest-only",
        }),
    }
}

/// Summary printed after hydration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HydrateSummary {
    #[serde(flatten)]
    pub(crate) hydration: HydrationSummary,
    pub(crate) recommended_applied: Option<usize>,
}

pub(crate) fn run_hydrate(args: HydrateArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_hydrate(&config)?;
    write_summary(writer, &summary)
}

pub(crate) fn execute_hydrate(config: &HydrateConfig) -> Result<HydrateSummary, CliError> {
    let hhfs = load_hhf_table(&config.hhf_table)?;
    let blacklist = load_blacklist(config.blacklist.as_deref())?;
    let recommended = config
        .recommended
        .as_deref()
        .map(load_recommended)
        .transpose()?;
    let batches = ArtifactDir::open(&config.imported_dir).map_err(|source| {
        CliError::PrepareDirectory {
            field: ARG_IMPORTED_DIR,
            path: config.imported_dir.clone(),
            source,
        }
    })?;
    let mut store = SqliteScoreStore::open(config.store.as_std_path())?;

    let resolver = hhfs.with_policy(config.resolution);
    let normalizer = Normalizer::new(&resolver, &blacklist);
    let hydration = hydrate_batches(&batches, &mut store, &normalizer)?;
    let recommended_applied = recommended
        .map(|table| apply_recommended_to_store(&mut store, &table))
        .transpose()?;
    Ok(HydrateSummary {
        hydration,
        recommended_applied,
    })
}

pub(crate) fn load_hhf_table(path: &Utf8Path) -> Result<HhfTable, CliError> {
    let bytes = read_input(path, ARG_HHF_TABLE)?;
    HhfTable::from_reader(bytes.as_slice()).map_err(|source| CliError::HhfTable {
        field: ARG_HHF_TABLE,
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn load_recommended(path: &Utf8Path) -> Result<RecommendedHhfTable, CliError> {
    let bytes = read_input(path, ARG_RECOMMENDED)?;
    RecommendedHhfTable::from_reader(bytes.as_slice()).map_err(|source| CliError::HhfTable {
        field: ARG_RECOMMENDED,
        path: path.to_path_buf(),
        source,
    })
}

fn load_blacklist(path: Option<&Utf8Path>) -> Result<Blacklist, CliError> {
    let mut blacklist = Blacklist::default();
    if let Some(path) = path {
        let bytes = read_input(path, ARG_BLACKLIST)?;
        let added = blacklist
            .extend_from_reader(bytes.as_slice())
            .map_err(|source| CliError::Blacklist {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("loaded {added} blacklist keys from {path}");
    }
    Ok(blacklist)
}
