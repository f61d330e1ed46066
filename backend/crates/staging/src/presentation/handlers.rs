//! HTTP Handlers

use std::sync::Arc;

use auth::{Identity, TokenProcessor};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use kernel::error::app_error::AppResult;
use kernel::id::CacheKey;
use platform::EphemeralStore;

use crate::application::commit_batch::CommitBatchUseCase;
use crate::application::config::StagingConfig;
use crate::application::stage_batch::StageBatchUseCase;
use crate::domain::entity::staged_batch::StagedBatch;
use crate::domain::repository::BatchWriter;
use crate::error::StagingResult;
use crate::presentation::dto::{CommitBatchResponse, StageBatchRequest, StageBatchResponse};

/// Shared state for staging handlers
pub struct StagingAppState<W> {
    pub store: Arc<EphemeralStore<StagedBatch>>,
    pub writer: Arc<W>,
    /// Verifies bearer tokens for the staging routes
    pub tokens: Arc<TokenProcessor>,
}

impl<W> Clone for StagingAppState<W> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            writer: self.writer.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<W> StagingAppState<W>
where
    W: BatchWriter + Send + Sync + 'static,
{
    /// Create the staging store and start its reaper. Requires a tokio runtime.
    pub fn new(writer: W, tokens: Arc<TokenProcessor>, config: &StagingConfig) -> AppResult<Self> {
        let store = EphemeralStore::new("staging", config.store_config())?;
        Ok(Self {
            store: Arc::new(store),
            writer: Arc::new(writer),
            tokens,
        })
    }

    pub fn shutdown(&self) {
        self.store.shutdown();
        tracing::info!("Staging store shut down");
    }
}

/// POST /api/staging/batches
pub async fn stage_batch<W>(
    State(state): State<StagingAppState<W>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<StageBatchRequest>,
) -> StagingResult<Json<StageBatchResponse>>
where
    W: BatchWriter + Send + Sync + 'static,
{
    let output = StageBatchUseCase::new(state.store.clone()).execute(identity.user_id, req.rows)?;

    Ok(Json(StageBatchResponse {
        data_key: output.data_key,
        row_count: output.row_count,
    }))
}

/// POST /api/staging/batches/{data_key}/commit
pub async fn commit_batch<W>(
    State(state): State<StagingAppState<W>>,
    Extension(identity): Extension<Identity>,
    Path(data_key): Path<CacheKey>,
) -> StagingResult<Json<CommitBatchResponse>>
where
    W: BatchWriter + Send + Sync + 'static,
{
    let use_case = CommitBatchUseCase::new(state.store.clone(), state.writer.clone());
    let output = use_case.execute(identity.user_id, data_key).await?;

    Ok(Json(CommitBatchResponse {
        rows_written: output.rows_written,
    }))
}
