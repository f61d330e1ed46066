//! Staging DTOs

use kernel::id::CacheKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageBatchRequest {
    pub rows: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageBatchResponse {
    pub data_key: CacheKey,
    pub row_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitBatchResponse {
    pub rows_written: u64,
}
