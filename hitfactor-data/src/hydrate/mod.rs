//! Hydration: batch files in, canonical score records out.
//!
//! [`hydrate_batches`] clears the target store, then reads every
//! `classifiers.*.json` batch file in name order and normalises each
//! fulfilled payload. Legacy entries, blacklisted entries and unmapped
//! divisions are filtered silently and counted in the [`HydrationSummary`].
#![forbid(unsafe_code)]

mod blacklist;
mod normalize;
mod payload;

use std::io;

use camino::Utf8PathBuf;
use hitfactor_core::RecommendedHhfTable;
use hitfactor_fs::ArtifactDir;
use thiserror::Error;

use crate::fetch::{BatchName, SettledEntry};
use crate::store::{ScoreStore, StoreError};
use crate::upstream::Operation;

pub use blacklist::Blacklist;
pub use normalize::{HydrationSummary, Normalizer, apply_recommended_hhfs};

/// Errors that abort a hydration run.
#[derive(Debug, Error)]
pub enum HydrateError {
    /// The batch directory could not be listed.
    #[error("failed to list batch files in {path}: {source}")]
    List {
        /// Directory being listed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A batch file could not be read.
    #[error("failed to read batch file {name}: {source}")]
    Read {
        /// Batch file name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A batch file was not a list of settled entries.
    #[error("failed to decode batch file {name}: {source}")]
    Decode {
        /// Batch file name.
        name: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The score store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Replace the contents of `store` with the records in `batches`.
///
/// Every batch is decoded before the store is touched, so a failed run
/// leaves the previous contents in place.
///
/// # Errors
/// Returns [`HydrateError`] when a batch file cannot be read or decoded, or
/// the store fails.
pub fn hydrate_batches(
    batches: &ArtifactDir,
    store: &mut dyn ScoreStore,
    normalizer: &Normalizer<'_>,
) -> Result<HydrationSummary, HydrateError> {
    let names = batches
        .file_names()
        .map_err(|source| HydrateError::List {
            path: batches.path().to_path_buf(),
            source,
        })?;

    let mut summary = HydrationSummary::default();
    let mut records = Vec::new();
    for name in names.iter().filter(|name| is_classifier_batch(name)) {
        let bytes = batches.read(name).map_err(|source| HydrateError::Read {
            name: name.clone(),
            source,
        })?;
        let entries: Vec<SettledEntry> =
            serde_json::from_slice(&bytes).map_err(|source| HydrateError::Decode {
                name: name.clone(),
                source,
            })?;
        summary.files_read += 1;

        let before = records.len();
        for entry in &entries {
            match entry.value() {
                Some(payload) => {
                    summary.members_read += 1;
                    records.extend(normalizer.normalize(entry.member_number(), payload, &mut summary));
                }
                None => summary.failed_members += 1,
            }
        }
        log::debug!("{name}: {} records", records.len() - before);
    }

    store.replace_all(&records)?;
    summary.records_written = records.len();
    log::info!(
        "hydrated {} records from {} files ({} failed members, {} legacy, {} blacklisted, {} unknown HHF)",
        summary.records_written,
        summary.files_read,
        summary.failed_members,
        summary.legacy_dropped,
        summary.blacklisted_dropped,
        summary.unknown_hhfs,
    );
    Ok(summary)
}

/// Reload `store`, fill recommended HHFs from `table` and write it back.
///
/// # Errors
/// Returns [`StoreError`] when the store fails.
pub fn apply_recommended_to_store(
    store: &mut dyn ScoreStore,
    table: &RecommendedHhfTable,
) -> Result<usize, StoreError> {
    let mut records = store.load_all()?;
    let applied = apply_recommended_hhfs(&mut records, table);
    store.replace_all(&records)?;
    log::info!("applied recommended HHFs to {applied} of {} records", records.len());
    Ok(applied)
}

fn is_classifier_batch(name: &str) -> bool {
    BatchName::parse(name).is_some_and(|batch| batch.operation == Operation::Classifiers)
}
