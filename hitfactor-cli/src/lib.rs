//! Command-line interface for the hitfactor ingestion and analytics tools.
//!
//! Each subcommand layers its options from CLI flags, `HITFACTOR_*`
//! environment variables and configuration files, then validates them into
//! a concrete configuration before touching the filesystem or network.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use std::io::Write;

mod analyze;
mod directory;
mod error;
mod fetch;
mod hydrate;
pub mod logging;

pub use error::CliError;

use analyze::AnalyzeArgs;
use directory::DirectoryArgs;
use fetch::FetchArgs;
use hydrate::HydrateArgs;

pub(crate) const ARG_SNAPSHOT: &str = "snapshot";
pub(crate) const ARG_META_DIR: &str = "meta-dir";
pub(crate) const ARG_ACTIVE_AFTER: &str = "active-after";
pub(crate) const ARG_IMPORTED_DIR: &str = "imported-dir";
pub(crate) const ARG_REFERENCE_DIR: &str = "reference-dir";
pub(crate) const ARG_API_KEYS: &str = "api-keys";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_API_VERSION: &str = "api-version";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_SLICE_SIZE: &str = "slice-size";
pub(crate) const ARG_MAX_RETRIES: &str = "max-retries";
pub(crate) const ARG_RESUME: &str = "resume";
pub(crate) const ARG_HHF_TABLE: &str = "hhf-table";
pub(crate) const ARG_RECOMMENDED: &str = "recommended";
pub(crate) const ARG_BLACKLIST: &str = "blacklist";
pub(crate) const ARG_RESOLUTION: &str = "resolution";
pub(crate) const ARG_STORE: &str = "store";
pub(crate) const ARG_OUT_DIR: &str = "out-dir";

pub(crate) const ENV_DIRECTORY_SNAPSHOT: &str = "HITFACTOR_CMDS_DIRECTORY_SNAPSHOT";
pub(crate) const ENV_DIRECTORY_META_DIR: &str = "HITFACTOR_CMDS_DIRECTORY_META_DIR";
pub(crate) const ENV_FETCH_META_DIR: &str = "HITFACTOR_CMDS_FETCH_META_DIR";
pub(crate) const ENV_FETCH_IMPORTED_DIR: &str = "HITFACTOR_CMDS_FETCH_IMPORTED_DIR";
pub(crate) const ENV_FETCH_API_KEYS: &str = "HITFACTOR_CMDS_FETCH_API_KEYS";
pub(crate) const ENV_HYDRATE_IMPORTED_DIR: &str = "HITFACTOR_CMDS_HYDRATE_IMPORTED_DIR";
pub(crate) const ENV_HYDRATE_HHF_TABLE: &str = "HITFACTOR_CMDS_HYDRATE_HHF_TABLE";
pub(crate) const ENV_HYDRATE_STORE: &str = "HITFACTOR_CMDS_HYDRATE_STORE";
pub(crate) const ENV_ANALYZE_STORE: &str = "HITFACTOR_CMDS_ANALYZE_STORE";
pub(crate) const ENV_ANALYZE_HHF_TABLE: &str = "HITFACTOR_CMDS_ANALYZE_HHF_TABLE";
pub(crate) const ENV_ANALYZE_OUT_DIR: &str = "HITFACTOR_CMDS_ANALYZE_OUT_DIR";

/// Run the hitfactor CLI with the current process arguments and environment.
///
/// Command summaries are written to standard output as JSON.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Directory(args) => directory::run_directory(args, writer),
        Command::Fetch(args) => fetch::run_fetch(args, writer),
        Command::Hydrate(args) => hydrate::run_hydrate(args, writer),
        Command::Analyze(args) => analyze::run_analyze(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hitfactor",
    about = "Classifier score ingestion and analytics for practical shooting",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the member directory and priority tiers from a snapshot.
    Directory(DirectoryArgs),
    /// Fetch per-member classifier documents in restartable slices.
    Fetch(FetchArgs),
    /// Normalise fetched batches into the score store.
    Hydrate(HydrateArgs),
    /// Compute per-classifier analytics from the score store.
    Analyze(AnalyzeArgs),
}

/// Serialise a command summary as pretty JSON followed by a newline.
pub(crate) fn write_summary<T: serde::Serialize>(
    writer: &mut dyn Write,
    summary: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(summary).map_err(CliError::SerialiseSummary)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

/// Read a whole input file named by a CLI option.
pub(crate) fn read_input(
    path: &camino::Utf8Path,
    field: &'static str,
) -> Result<Vec<u8>, CliError> {
    hitfactor_fs::read_ambient(path).map_err(|source| CliError::ReadInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests;
