//! Error types emitted by the hitfactor CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use hitfactor_analytics::AnalyticsError;
use hitfactor_core::HhfTableError;
use hitfactor_data::directory::{DirectoryWriteError, SnapshotFormatError, TierReadError};
use hitfactor_data::fetch::FetchError;
use hitfactor_data::hydrate::HydrateError;
use hitfactor_data::store::StoreError;
use hitfactor_data::upstream::{EmptyCredentialPool, TransportError};
use thiserror::Error;

/// Errors emitted by the hitfactor CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option was present but could not be interpreted.
    #[error("invalid {field} value {value:?}: expected {expected}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    /// An input file could not be read.
    #[error("failed to read {field} at {path:?}: {source}")]
    ReadInput {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An artefact directory could not be created or opened.
    #[error("failed to prepare {field} directory {path:?}: {source}")]
    PrepareDirectory {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The snapshot text had no usable header.
    #[error("snapshot at {path:?} is unusable: {source}")]
    Snapshot {
        path: Utf8PathBuf,
        #[source]
        source: SnapshotFormatError,
    },
    /// Writing the directory meta files failed.
    #[error(transparent)]
    WriteMeta(#[from] DirectoryWriteError),
    /// Tier lists could not be loaded from the meta directory.
    #[error(transparent)]
    ReadTiers(#[from] TierReadError),
    /// No usable API credential was configured.
    #[error("{0} (set --api-keys or HITFACTOR_CMDS_FETCH_API_KEYS)")]
    Credentials(#[from] EmptyCredentialPool),
    /// The HTTP client could not be built.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The fetch pipeline failed to persist its output.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// An HHF or recommended-HHF table was invalid.
    #[error("failed to load {field} from {path:?}: {source}")]
    HhfTable {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: HhfTableError,
    },
    /// The blacklist file was not a JSON array of keys.
    #[error("failed to parse blacklist at {path:?}: {source}")]
    Blacklist {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Hydration aborted.
    #[error(transparent)]
    Hydrate(#[from] HydrateError),
    /// The score store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Publishing analytics failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    /// Serialising a command summary failed.
    #[error("failed to serialise command summary: {0}")]
    SerialiseSummary(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
