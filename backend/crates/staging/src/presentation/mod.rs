//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::StagingAppState;
pub use router::staging_router;
