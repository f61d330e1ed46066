//! In-Memory Batch Writer
//!
//! For tests and local development without a database.

use std::sync::Arc;

use kernel::id::{CacheKey, UserId};
use parking_lot::Mutex;

use crate::domain::entity::staged_batch::StagedBatch;
use crate::domain::repository::BatchWriter;
use crate::error::StagingResult;

#[derive(Clone, Default)]
pub struct InMemoryBatchWriter {
    committed: Arc<Mutex<Vec<(CacheKey, StagedBatch)>>>,
}

impl InMemoryBatchWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches written so far, in commit order
    pub fn committed(&self) -> Vec<(CacheKey, StagedBatch)> {
        self.committed.lock().clone()
    }

    pub fn rows_for(&self, owner: &UserId) -> usize {
        self.committed
            .lock()
            .iter()
            .filter(|(_, batch)| batch.is_owned_by(owner))
            .map(|(_, batch)| batch.row_count())
            .sum()
    }
}

impl BatchWriter for InMemoryBatchWriter {
    async fn write_batch(&self, data_key: &CacheKey, batch: &StagedBatch) -> StagingResult<u64> {
        self.committed.lock().push((*data_key, batch.clone()));
        Ok(batch.row_count() as u64)
    }
}
