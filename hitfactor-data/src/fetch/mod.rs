//! Bulk fetch pipeline for per-member upstream documents.
//!
//! Members are processed in fixed-size slices. Within a slice every request
//! is issued at once and [`futures_util::future::join_all`] waits for all of
//! them; each outcome is captured as a [`SettledEntry`] so one failure never
//! loses the rest of the slice. The slice is written as a batch file named by
//! [`BatchName`] before the next slice begins, which makes the batch files
//! the restart boundary.
#![forbid(unsafe_code)]

mod batch;
mod pipeline;
mod retry;

pub use batch::{BatchName, SettledEntry};
pub use pipeline::{
    CLASSIFIER_CATALOGUE_FILE, FetchError, FetchOptions, FetchPipeline, FetchReport,
    OFFICIAL_HHF_FILE,
};
pub use retry::{RetryExhausted, RetryPolicy};
