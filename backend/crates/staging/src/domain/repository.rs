//! Repository Traits

use kernel::id::CacheKey;

use crate::domain::entity::staged_batch::StagedBatch;
use crate::error::StagingResult;

/// Persists a committed batch.
///
/// `data_key` is the staging key the batch was committed under; writers may
/// record it to correlate rows with the upload.
#[trait_variant::make(BatchWriter: Send)]
pub trait LocalBatchWriter {
    /// Write every row of `batch`, all or nothing. Returns rows written.
    async fn write_batch(&self, data_key: &CacheKey, batch: &StagedBatch) -> StagingResult<u64>;
}
