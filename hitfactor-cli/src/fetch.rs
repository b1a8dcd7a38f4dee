//! `fetch` command: priority tiers in, batch files out.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hitfactor_data::directory::read_tiers;
use hitfactor_data::fetch::{FetchOptions, FetchPipeline, FetchReport, RetryPolicy};
use hitfactor_data::upstream::{CredentialPool, HttpMemberApi, MemberApi, UpstreamConfig};
use hitfactor_fs::ArtifactDir;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_API_KEYS, ARG_API_VERSION, ARG_BASE_URL, ARG_IMPORTED_DIR, ARG_MAX_RETRIES, ARG_META_DIR,
    ARG_REFERENCE_DIR, ARG_RESUME, ARG_SLICE_SIZE, ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError,
    ENV_FETCH_API_KEYS, ENV_FETCH_IMPORTED_DIR, ENV_FETCH_META_DIR, write_summary,
};

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch classifier histories and classification records for \
                 every tiered member, highest tier first. Members are \
                 requested in slices and each slice is saved as one batch \
                 file, so an interrupted run can resume where it stopped.",
    about = "Fetch per-member documents from the upstream API"
)]
#[ortho_config(prefix = "HITFACTOR")]
pub(crate) struct FetchArgs {
    /// Directory holding the tier lists written by `directory`.
    #[arg(long = ARG_META_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) meta_dir: Option<Utf8PathBuf>,
    /// Directory receiving the batch files.
    #[arg(long = ARG_IMPORTED_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) imported_dir: Option<Utf8PathBuf>,
    /// Also fetch the official HHF listing and classifier catalogue here.
    #[arg(long = ARG_REFERENCE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) reference_dir: Option<Utf8PathBuf>,
    /// Comma-separated API credentials, used round-robin.
    #[arg(long = ARG_API_KEYS, value_name = "keys")]
    #[serde(default)]
    pub(crate) api_keys: Option<String>,
    /// Override the upstream API root.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Override the API version header.
    #[arg(long = ARG_API_VERSION, value_name = "version")]
    #[serde(default)]
    pub(crate) api_version: Option<String>,
    /// Override the user agent header.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Members requested concurrently per slice.
    #[arg(long = ARG_SLICE_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) slice_size: Option<usize>,
    /// Retries after the first failed attempt.
    #[arg(long = ARG_MAX_RETRIES, value_name = "count")]
    #[serde(default)]
    pub(crate) max_retries: Option<u32>,
    /// Keep batch files left by an earlier run.
    #[arg(
        long = ARG_RESUME,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) resume: Option<bool>,
}

impl FetchArgs {
    fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Resolved `fetch` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchConfig {
    pub(crate) meta_dir: Utf8PathBuf,
    pub(crate) imported_dir: Utf8PathBuf,
    pub(crate) reference_dir: Option<Utf8PathBuf>,
    pub(crate) api_keys: Vec<String>,
    pub(crate) upstream: UpstreamConfig,
    pub(crate) retry: RetryPolicy,
    pub(crate) options: FetchOptions,
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let meta_dir = args.meta_dir.ok_or(CliError::MissingArgument {
            field: ARG_META_DIR,
            env: ENV_FETCH_META_DIR,
        })?;
        let imported_dir = args.imported_dir.ok_or(CliError::MissingArgument {
            field: ARG_IMPORTED_DIR,
            env: ENV_FETCH_IMPORTED_DIR,
        })?;
        let api_keys: Vec<String> = args
            .api_keys
            .ok_or(CliError::MissingArgument {
                field: ARG_API_KEYS,
                env: ENV_FETCH_API_KEYS,
            })?
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_owned)
            .collect();

        let mut upstream = UpstreamConfig::default();
        if let Some(base_url) = args.base_url {
            upstream = upstream.with_base_url(base_url);
        }
        if let Some(api_version) = args.api_version {
            upstream = upstream.with_api_version(api_version);
        }
        if let Some(user_agent) = args.user_agent {
            upstream = upstream.with_user_agent(user_agent);
        }
        if let Some(secs) = args.timeout_secs {
            upstream = upstream.with_timeout(Duration::from_secs(secs));
        }

        let retry = args
            .max_retries
            .map_or_else(RetryPolicy::default, RetryPolicy::new);
        let mut options = FetchOptions::default().with_resume(args.resume.unwrap_or(false));
        if let Some(slice_size) = args.slice_size {
            options = options.with_slice_size(slice_size);
        }

        Ok(Self {
            meta_dir,
            imported_dir,
            reference_dir: args.reference_dir,
            api_keys,
            upstream,
            retry,
            options,
        })
    }
}

/// Summary printed after a fetch run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FetchSummary {
    pub(crate) slices_written: usize,
    pub(crate) slices_skipped: usize,
    pub(crate) members_requested: usize,
    pub(crate) failed_members: Vec<String>,
    pub(crate) reference_files: Vec<String>,
}

impl FetchSummary {
    fn new(report: FetchReport, reference_files: Vec<String>) -> Self {
        Self {
            slices_written: report.slices_written,
            slices_skipped: report.slices_skipped,
            members_requested: report.members_requested,
            failed_members: report.failed_members,
            reference_files,
        }
    }
}

pub(crate) fn run_fetch(args: FetchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let credentials = CredentialPool::new(config.api_keys.iter().map(String::as_str))?;
    let api = HttpMemberApi::new(config.upstream.clone(), credentials)?;
    let summary = execute_fetch(&config, &api)?;
    write_summary(writer, &summary)
}

/// Run the fetch pipeline against `api` on a single-threaded runtime.
///
/// The pipeline's futures borrow the API client and are not `Send`, so they
/// are driven on the current thread.
pub(crate) fn execute_fetch(
    config: &FetchConfig,
    api: &dyn MemberApi,
) -> Result<FetchSummary, CliError> {
    let meta = ArtifactDir::open(&config.meta_dir).map_err(|source| CliError::PrepareDirectory {
        field: ARG_META_DIR,
        path: config.meta_dir.clone(),
        source,
    })?;
    let tiers = read_tiers(&meta)?;
    let imported = create_dir(&config.imported_dir, ARG_IMPORTED_DIR)?;
    let reference = config
        .reference_dir
        .as_ref()
        .map(|path| create_dir(path, ARG_REFERENCE_DIR))
        .transpose()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
        .map_err(CliError::Runtime)?;
    let pipeline = FetchPipeline::new(api, config.retry.clone(), config.options);
    runtime.block_on(async {
        let reference_files = match &reference {
            Some(dir) => pipeline.fetch_reference(dir).await?,
            None => Vec::new(),
        };
        let report = pipeline.fetch_tiers(&tiers, &imported).await?;
        log::info!(
            "fetch finished: {} slices written, {} skipped, {} failed members",
            report.slices_written,
            report.slices_skipped,
            report.failed_members.len()
        );
        Ok::<_, CliError>(FetchSummary::new(report, reference_files))
    })
}

fn create_dir(path: &Utf8Path, field: &'static str) -> Result<ArtifactDir, CliError> {
    ArtifactDir::create(path).map_err(|source| CliError::PrepareDirectory {
        field,
        path: path.to_path_buf(),
        source,
    })
}
