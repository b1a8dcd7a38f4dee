use std::io;

use futures_util::future::{join, join_all};
use hitfactor_core::ClassLetter;
use hitfactor_fs::ArtifactDir;
use serde::Serialize;
use thiserror::Error;

use super::retry::{RetryExhausted, fetch_with_retry};
use super::{BatchName, RetryPolicy, SettledEntry};
use crate::directory::PriorityTiers;
use crate::upstream::{Endpoint, MemberApi, Operation};

/// File the official HHF listing is saved to.
pub const OFFICIAL_HHF_FILE: &str = "hhf.json";
/// Directory and file the classifier catalogue is saved to.
pub const CLASSIFIER_CATALOGUE_FILE: (&str, &str) = ("classifiers", "classifiers.json");

/// Errors that abort a fetch run.
///
/// Individual member failures never surface here; they are persisted as
/// [`SettledEntry::Failed`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// A batch or reference file could not be serialised.
    #[error("failed to serialise {name}: {source}")]
    Serialise {
        /// Artefact file name.
        name: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A batch or reference file could not be written.
    #[error("failed to write {name}: {source}")]
    Write {
        /// Artefact file name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A reference document could not be fetched.
    #[error("failed to fetch reference data: {source}")]
    Reference {
        /// Exhausted request.
        #[source]
        source: RetryExhausted,
    },
}

/// Tunables for slicing and restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    slice_size: usize,
    resume: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            slice_size: 256,
            resume: false,
        }
    }
}

impl FetchOptions {
    /// Members per slice; zero is treated as one.
    #[must_use]
    pub const fn with_slice_size(mut self, slice_size: usize) -> Self {
        self.slice_size = if slice_size == 0 { 1 } else { slice_size };
        self
    }

    /// Skip slices whose batch file already exists.
    #[must_use]
    pub const fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Members per slice.
    #[must_use]
    pub const fn slice_size(&self) -> usize {
        self.slice_size
    }

    /// Whether existing batch files are kept.
    #[must_use]
    pub const fn resume(&self) -> bool {
        self.resume
    }
}

/// Summary of a fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Batch files written.
    pub slices_written: usize,
    /// Batch files left in place by a resumed run.
    pub slices_skipped: usize,
    /// Members requested, failures included.
    pub members_requested: usize,
    /// One member number per exhausted request.
    pub failed_members: Vec<String>,
}

impl FetchReport {
    fn absorb(&mut self, other: Self) {
        self.slices_written += other.slices_written;
        self.slices_skipped += other.slices_skipped;
        self.members_requested += other.members_requested;
        self.failed_members.extend(other.failed_members);
    }
}

/// Slice-by-slice fetcher writing one batch file per slice.
///
/// Requests within a slice run concurrently; a slice's batch file is written
/// before the next slice starts.
#[derive(Debug)]
pub struct FetchPipeline<'a, A: MemberApi + ?Sized> {
    api: &'a A,
    retry: RetryPolicy,
    options: FetchOptions,
}

impl<'a, A: MemberApi + ?Sized> FetchPipeline<'a, A> {
    /// Pipeline over `api`.
    pub const fn new(api: &'a A, retry: RetryPolicy, options: FetchOptions) -> Self {
        Self {
            api,
            retry,
            options,
        }
    }

    /// Fetch both operations for every tier, highest tier first.
    ///
    /// # Errors
    /// Returns [`FetchError`] when a batch file cannot be written.
    pub async fn fetch_tiers(
        &self,
        tiers: &PriorityTiers,
        out: &ArtifactDir,
    ) -> Result<FetchReport, FetchError> {
        let mut report = FetchReport::default();
        for (tier, members) in tiers.iter() {
            log::info!("fetching {} {tier} members", members.len());
            report.absorb(self.fetch_tier(tier, members, out).await?);
        }
        Ok(report)
    }

    /// Fetch both operations for one tier concurrently.
    ///
    /// # Errors
    /// Returns [`FetchError`] when a batch file cannot be written.
    pub async fn fetch_tier(
        &self,
        tier: ClassLetter,
        members: &[String],
        out: &ArtifactDir,
    ) -> Result<FetchReport, FetchError> {
        let (classifiers, classification) = join(
            self.fetch_operation(Operation::Classifiers, tier, members, out),
            self.fetch_operation(Operation::Classification, tier, members, out),
        )
        .await;
        let mut report = classifiers?;
        report.absorb(classification?);
        Ok(report)
    }

    /// Fetch one operation for `members`, slice by slice.
    ///
    /// # Errors
    /// Returns [`FetchError`] when a batch file cannot be written.
    pub async fn fetch_operation(
        &self,
        operation: Operation,
        tier: ClassLetter,
        members: &[String],
        out: &ArtifactDir,
    ) -> Result<FetchReport, FetchError> {
        let mut report = FetchReport::default();
        let slices = members.chunks(self.options.slice_size());
        let total = slices.len();
        for (index, slice) in slices.enumerate() {
            let name = BatchName::new(operation, tier, index + 1).to_string();
            if self.options.resume() && out.contains_file(&name) {
                log::info!("skipping {name}: already fetched");
                report.slices_skipped += 1;
                continue;
            }

            let entries = self.fetch_slice(operation, slice).await;
            report.members_requested += entries.len();
            report.failed_members.extend(
                entries
                    .iter()
                    .filter(|entry| entry.is_failed())
                    .map(|entry| entry.member_number().to_owned()),
            );
            write_json(out, &name, &entries)?;
            report.slices_written += 1;
            log::info!("{operation} {tier} slice {}/{total} done", index + 1);
        }
        Ok(report)
    }

    /// Fetch and save the official HHF listing and the classifier catalogue.
    ///
    /// Both requests share the member retry policy. Returns the written
    /// paths relative to `root`.
    ///
    /// # Errors
    /// Returns [`FetchError::Reference`] when either document cannot be
    /// fetched, or a write error.
    pub async fn fetch_reference(&self, root: &ArtifactDir) -> Result<Vec<String>, FetchError> {
        let (hhfs, catalogue) = join(
            fetch_with_retry(self.api, &Endpoint::official_hhfs(), &self.retry),
            fetch_with_retry(self.api, &Endpoint::classifier_catalogue(), &self.retry),
        )
        .await;
        let hhfs = hhfs.map_err(|source| FetchError::Reference { source })?;
        let catalogue = catalogue.map_err(|source| FetchError::Reference { source })?;

        write_json(root, OFFICIAL_HHF_FILE, &hhfs)?;
        let (subdir, file) = CLASSIFIER_CATALOGUE_FILE;
        let classifiers = root.subdir(subdir).map_err(|source| FetchError::Write {
            name: subdir.to_owned(),
            source,
        })?;
        write_json(&classifiers, file, &catalogue)?;
        Ok(vec![OFFICIAL_HHF_FILE.to_owned(), format!("{subdir}/{file}")])
    }

    /// Request every member in `slice` concurrently and wait for all of them.
    pub async fn fetch_slice(&self, operation: Operation, slice: &[String]) -> Vec<SettledEntry> {
        join_all(
            slice
                .iter()
                .map(|member_number| self.settle(operation, member_number)),
        )
        .await
    }

    async fn settle(&self, operation: Operation, member_number: &str) -> SettledEntry {
        let endpoint = Endpoint::member(operation, member_number);
        match fetch_with_retry(self.api, &endpoint, &self.retry).await {
            Ok(value) => SettledEntry::Fulfilled {
                member_number: member_number.to_owned(),
                value,
            },
            Err(exhausted) => {
                log::warn!("{exhausted}");
                SettledEntry::Failed {
                    member_number: member_number.to_owned(),
                    attempts: exhausted.attempts,
                    error: exhausted.source.to_string(),
                }
            }
        }
    }
}

fn write_json<T: Serialize + ?Sized>(
    dir: &ArtifactDir,
    name: &str,
    value: &T,
) -> Result<(), FetchError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| FetchError::Serialise {
        name: name.to_owned(),
        source,
    })?;
    dir.write_atomic(name, bytes)
        .map_err(|source| FetchError::Write {
            name: name.to_owned(),
            source,
        })
}
