//! `analyze` command: score store in, `analytics.json` out.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use hitfactor_analytics::{ANALYTICS_FILE, aggregate, write_analytics};
use hitfactor_core::RecommendedHhfTable;
use hitfactor_data::store::{ScoreStore, SqliteScoreStore};
use hitfactor_fs::ArtifactDir;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::hydrate::{load_hhf_table, load_recommended};
use crate::{
    ARG_HHF_TABLE, ARG_OUT_DIR, ARG_RECOMMENDED, ARG_STORE, CliError, ENV_ANALYZE_HHF_TABLE,
    ENV_ANALYZE_OUT_DIR, ENV_ANALYZE_STORE, write_summary,
};

/// CLI arguments for the `analyze` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Group the hydrated score records by division and \
                 classifier, compute inverse percentiles of current and \
                 recommended percents and write them to analytics.json.",
    about = "Compute per-classifier analytics"
)]
#[ortho_config(prefix = "HITFACTOR")]
pub(crate) struct AnalyzeArgs {
    /// SQLite database written by `hydrate`.
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
    /// JSON array of HHF revisions.
    #[arg(long = ARG_HHF_TABLE, value_name = "path")]
    #[serde(default)]
    pub(crate) hhf_table: Option<Utf8PathBuf>,
    /// JSON array of recommended HHFs.
    #[arg(long = ARG_RECOMMENDED, value_name = "path")]
    #[serde(default)]
    pub(crate) recommended: Option<Utf8PathBuf>,
    /// Directory receiving `analytics.json`.
    #[arg(long = ARG_OUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) out_dir: Option<Utf8PathBuf>,
}

impl AnalyzeArgs {
    fn into_config(self) -> Result<AnalyzeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AnalyzeConfig::try_from(merged)
    }
}

/// Resolved `analyze` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnalyzeConfig {
    pub(crate) store: Utf8PathBuf,
    pub(crate) hhf_table: Utf8PathBuf,
    pub(crate) recommended: Option<Utf8PathBuf>,
    pub(crate) out_dir: Utf8PathBuf,
}

impl TryFrom<AnalyzeArgs> for AnalyzeConfig {
    type Error = CliError;

    fn try_from(args: AnalyzeArgs) -> Result<Self, Self::Error> {
        let store = args.store.ok_or(CliError::MissingArgument {
            field: ARG_STORE,
            env: ENV_ANALYZE_STORE,
        })?;
        let hhf_table = args.hhf_table.ok_or(CliError::MissingArgument {
            field: ARG_HHF_TABLE,
            env: ENV_ANALYZE_HHF_TABLE,
        })?;
        let out_dir = args.out_dir.ok_or(CliError::MissingArgument {
            field: ARG_OUT_DIR,
            env: ENV_ANALYZE_OUT_DIR,
        })?;
        Ok(Self {
            store,
            hhf_table,
            recommended: args.recommended,
            out_dir,
        })
    }
}

/// Summary printed after analytics are written.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalyzeSummary {
    pub(crate) records: usize,
    pub(crate) rows: usize,
    pub(crate) output: Utf8PathBuf,
}

pub(crate) fn run_analyze(args: AnalyzeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_analyze(&config)?;
    write_summary(writer, &summary)
}

pub(crate) fn execute_analyze(config: &AnalyzeConfig) -> Result<AnalyzeSummary, CliError> {
    let hhfs = load_hhf_table(&config.hhf_table)?;
    let recommended = match &config.recommended {
        Some(path) => load_recommended(path)?,
        None => RecommendedHhfTable::default(),
    };
    let store = SqliteScoreStore::open(config.store.as_std_path())?;
    let records = store.load_all()?;

    let rows = aggregate(&records, &hhfs, &recommended);
    let out = ArtifactDir::create(&config.out_dir).map_err(|source| CliError::PrepareDirectory {
        field: ARG_OUT_DIR,
        path: config.out_dir.clone(),
        source,
    })?;
    write_analytics(&rows, &out)?;
    Ok(AnalyzeSummary {
        records: records.len(),
        rows: rows.len(),
        output: config.out_dir.join(ANALYTICS_FILE),
    })
}
