//! Staging (Upload Staging) Backend Module
//!
//! Two-step ingestion: a parsed upload is first staged in memory under an
//! opaque data key, then committed by key. Staged batches expire after a
//! fixed TTL; a commit evicts the batch, so it can be written at most once.
//!
//! Clean Architecture structure:
//! - `domain/` - Staged batch entity and the batch writer seam
//! - `application/` - Configuration, stage and commit use cases
//! - `infra/` - PostgreSQL and in-memory batch writers
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::StagingConfig;
pub use error::{StagingError, StagingResult};
pub use infra::{InMemoryBatchWriter, PgBatchWriter};
pub use presentation::{StagingAppState, staging_router};
