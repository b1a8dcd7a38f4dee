use hitfactor_core::ScoreRecord;

use super::{ScoreStore, StoreError};

/// In-memory [`ScoreStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    records: Vec<ScoreRecord>,
}

impl MemoryScoreStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored records.
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }
}

impl ScoreStore for MemoryScoreStore {
    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }

    fn insert_many(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(self.records.clone())
    }
}
