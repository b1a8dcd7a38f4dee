//! Error types raised while publishing analytics.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while writing analytics artefacts.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Rows could not be serialised.
    #[error("failed to serialise analytics rows")]
    Serialise {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The analytics file could not be written.
    #[error("failed to write analytics to {path}")]
    Write {
        /// Destination path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
}
