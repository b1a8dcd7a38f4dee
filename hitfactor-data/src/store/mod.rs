//! Storage boundary for normalised score records.
//!
//! Hydration replaces the whole record set: it always calls
//! [`ScoreStore::clear`] before inserting.
#![forbid(unsafe_code)]

mod memory;
mod sqlite;

use hitfactor_core::ScoreRecord;
use thiserror::Error;

pub use memory::MemoryScoreStore;
pub use sqlite::SqliteScoreStore;

/// Errors raised by a [`ScoreStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQLite statement failed.
    #[error("SQLite error during {operation}: {source}")]
    Sqlite {
        /// Operation being performed.
        operation: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored row could not be turned back into a record.
    #[error("stored score row {row} is invalid: {message}")]
    Corrupt {
        /// Row identifier.
        row: i64,
        /// Description of the problem.
        message: String,
    },
}

/// Persistence for [`ScoreRecord`] sets.
pub trait ScoreStore {
    /// Remove every stored record.
    fn clear(&mut self) -> Result<(), StoreError>;

    /// Append `records` in order.
    fn insert_many(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError>;

    /// Every stored record in insertion order.
    fn load_all(&self) -> Result<Vec<ScoreRecord>, StoreError>;

    /// Replace the stored set with `records`.
    fn replace_all(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        self.clear()?;
        self.insert_many(records)
    }
}
