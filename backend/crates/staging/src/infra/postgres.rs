//! PostgreSQL Batch Writer

use kernel::id::CacheKey;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::domain::entity::staged_batch::StagedBatch;
use crate::domain::repository::BatchWriter;
use crate::error::StagingResult;

/// Writes committed rows into `staged_rows` as JSONB
#[derive(Clone)]
pub struct PgBatchWriter {
    pool: PgPool,
}

impl PgBatchWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BatchWriter for PgBatchWriter {
    async fn write_batch(&self, data_key: &CacheKey, batch: &StagedBatch) -> StagingResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for (row_index, row) in batch.rows.iter().enumerate() {
            let result = sqlx::query(
                r#"
                INSERT INTO staged_rows
                    (data_key, owner_id, row_index, payload, staged_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(data_key.as_uuid())
            .bind(batch.owner.as_uuid())
            .bind(row_index as i32)
            .bind(Json(row))
            .bind(batch.staged_at)
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }
}
