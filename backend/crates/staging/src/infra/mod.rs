//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryBatchWriter;
pub use postgres::PgBatchWriter;
