//! Application Layer
//!
//! Use cases and configuration.

pub mod commit_batch;
pub mod config;
pub mod stage_batch;

pub use commit_batch::{CommitBatchOutput, CommitBatchUseCase};
pub use config::StagingConfig;
pub use stage_batch::{StageBatchOutput, StageBatchUseCase};
