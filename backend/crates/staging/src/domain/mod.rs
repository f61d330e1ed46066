//! Domain Layer

pub mod entity;
pub mod repository;

pub use entity::staged_batch::StagedBatch;
pub use repository::BatchWriter;
