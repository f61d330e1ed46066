//! Stage Batch Use Case

use std::sync::Arc;

use kernel::id::{CacheKey, UserId};
use platform::EphemeralStore;
use serde_json::Value;

use crate::domain::entity::staged_batch::StagedBatch;
use crate::error::{StagingError, StagingResult};

/// Output DTO for stage batch
#[derive(Debug, Clone, Copy)]
pub struct StageBatchOutput {
    pub data_key: CacheKey,
    pub row_count: usize,
}

/// Stage Batch Use Case
///
/// Holds a parsed upload in memory until the caller confirms it.
pub struct StageBatchUseCase {
    store: Arc<EphemeralStore<StagedBatch>>,
}

impl StageBatchUseCase {
    pub fn new(store: Arc<EphemeralStore<StagedBatch>>) -> Self {
        Self { store }
    }

    pub fn execute(&self, owner: UserId, rows: Vec<Value>) -> StagingResult<StageBatchOutput> {
        if rows.is_empty() {
            return Err(StagingError::EmptyBatch);
        }

        let batch = StagedBatch::new(owner, rows);
        let row_count = batch.row_count();
        let data_key = self.store.put(batch);

        tracing::info!(user_id = %owner, key = %data_key, row_count, "Staged batch");

        Ok(StageBatchOutput {
            data_key,
            row_count,
        })
    }
}
