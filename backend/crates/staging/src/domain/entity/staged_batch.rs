//! Staged Batch Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde_json::Value;

/// Rows of one parsed upload, waiting in the staging store for a commit.
///
/// Rows are opaque JSON objects; column mapping happens before staging.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedBatch {
    pub owner: UserId,
    pub rows: Vec<Value>,
    pub staged_at: DateTime<Utc>,
}

impl StagedBatch {
    pub fn new(owner: UserId, rows: Vec<Value>) -> Self {
        Self {
            owner,
            rows,
            staged_at: Utc::now(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner == user_id
    }
}
