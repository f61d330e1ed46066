//! Commit Batch Use Case

use std::sync::Arc;

use kernel::id::{CacheKey, UserId};
use platform::EphemeralStore;

use crate::domain::entity::staged_batch::StagedBatch;
use crate::domain::repository::BatchWriter;
use crate::error::{StagingError, StagingResult};

/// Output DTO for commit batch
#[derive(Debug, Clone, Copy)]
pub struct CommitBatchOutput {
    pub rows_written: u64,
}

/// Commit Batch Use Case
///
/// Evicts the staged batch and hands it to the writer. Of concurrent commits
/// for one key at most one gets the batch; the rest see it as gone. A failed
/// write does not restore the batch: the caller uploads again.
pub struct CommitBatchUseCase<W>
where
    W: BatchWriter,
{
    store: Arc<EphemeralStore<StagedBatch>>,
    writer: Arc<W>,
}

impl<W> CommitBatchUseCase<W>
where
    W: BatchWriter,
{
    pub fn new(store: Arc<EphemeralStore<StagedBatch>>, writer: Arc<W>) -> Self {
        Self { store, writer }
    }

    pub async fn execute(&self, caller: UserId, data_key: CacheKey) -> StagingResult<CommitBatchOutput> {
        // ownership is checked without evicting so a stranger cannot discard the batch
        let owned = self.store.with(&data_key, |staged| staged.is_owned_by(&caller))?;
        if !owned {
            return Err(StagingError::NotOwner);
        }

        let batch = self.store.fetch(&data_key, true)?;
        let rows_written = self.writer.write_batch(&data_key, &batch).await?;

        tracing::info!(user_id = %caller, key = %data_key, rows_written, "Committed batch");

        Ok(CommitBatchOutput { rows_written })
    }
}
