//! `directory` command: snapshot in, meta artefacts out.

use std::collections::BTreeMap;
use std::io::Write;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::Parser;
use hitfactor_core::{Division, parse_upstream_date};
use hitfactor_data::directory::{Directory, DirectoryBuilder, write_meta};
use hitfactor_fs::ArtifactDir;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ACTIVE_AFTER, ARG_META_DIR, ARG_SNAPSHOT, CliError, ENV_DIRECTORY_META_DIR,
    ENV_DIRECTORY_SNAPSHOT, read_input, write_summary,
};

/// CLI arguments for the `directory` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Parse the periodic classification snapshot, partition \
                 active classified members into priority tiers and write \
                 the meta artefacts consumed by the fetch command.",
    about = "Build the member directory from a classification snapshot"
)]
#[ortho_config(prefix = "HITFACTOR")]
pub(crate) struct DirectoryArgs {
    /// Path to the classification snapshot text file.
    #[arg(long = ARG_SNAPSHOT, value_name = "path")]
    #[serde(default)]
    pub(crate) snapshot: Option<Utf8PathBuf>,
    /// Directory receiving the meta artefacts.
    #[arg(long = ARG_META_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) meta_dir: Option<Utf8PathBuf>,
    /// Exclude members whose membership expired on or before this date.
    #[arg(long = ARG_ACTIVE_AFTER, value_name = "date")]
    #[serde(default)]
    pub(crate) active_after: Option<String>,
}

impl DirectoryArgs {
    fn into_config(self) -> Result<DirectoryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DirectoryConfig::try_from(merged)
    }
}

/// Resolved `directory` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectoryConfig {
    pub(crate) snapshot: Utf8PathBuf,
    pub(crate) meta_dir: Utf8PathBuf,
    pub(crate) active_after: Option<NaiveDate>,
}

impl TryFrom<DirectoryArgs> for DirectoryConfig {
    type Error = CliError;

    fn try_from(args: DirectoryArgs) -> Result<Self, Self::Error> {
        let snapshot = args.snapshot.ok_or(CliError::MissingArgument {
            field: ARG_SNAPSHOT,
            env: ENV_DIRECTORY_SNAPSHOT,
        })?;
        let meta_dir = args.meta_dir.ok_or(CliError::MissingArgument {
            field: ARG_META_DIR,
            env: ENV_DIRECTORY_META_DIR,
        })?;
        let active_after = args
            .active_after
            .map(|value| {
                parse_upstream_date(&value).ok_or(CliError::InvalidArgument {
                    field: ARG_ACTIVE_AFTER,
                    value,
                    expected: "a date such as 2024-03-31",
                })
            })
            .transpose()?;
        Ok(Self {
            snapshot,
            meta_dir,
            active_after,
        })
    }
}

/// Summary printed after the meta artefacts are written.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DirectorySummary {
    pub(crate) members: usize,
    pub(crate) classified: usize,
    pub(crate) tiers: BTreeMap<&'static str, usize>,
    pub(crate) divisions: BTreeMap<&'static str, usize>,
    pub(crate) files: Vec<String>,
}

impl DirectorySummary {
    fn new(directory: &Directory, files: Vec<String>) -> Self {
        Self {
            members: directory.members().len(),
            classified: directory.classified_numbers().len(),
            tiers: directory
                .tiers()
                .iter()
                .map(|(letter, members)| (letter.tier_tag(), members.len()))
                .collect(),
            divisions: directory
                .division_stats()
                .into_iter()
                .map(|(division, count)| (Division::short_code(division), count))
                .collect(),
            files,
        }
    }
}

pub(crate) fn run_directory(args: DirectoryArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_directory(&config)?;
    write_summary(writer, &summary)
}

pub(crate) fn execute_directory(config: &DirectoryConfig) -> Result<DirectorySummary, CliError> {
    let bytes = read_input(&config.snapshot, ARG_SNAPSHOT)?;
    let text = String::from_utf8_lossy(&bytes);
    let mut builder = DirectoryBuilder::new();
    if let Some(cutoff) = config.active_after {
        builder = builder.with_active_after(cutoff);
    }
    let directory = builder
        .build(&text)
        .map_err(|source| CliError::Snapshot {
            path: config.snapshot.clone(),
            source,
        })?;

    let meta = ArtifactDir::create(&config.meta_dir).map_err(|source| {
        CliError::PrepareDirectory {
            field: ARG_META_DIR,
            path: config.meta_dir.clone(),
            source,
        }
    })?;
    let files = write_meta(&directory, &meta)?;
    log::info!("wrote {} meta files to {}", files.len(), config.meta_dir);
    Ok(DirectorySummary::new(&directory, files))
}
