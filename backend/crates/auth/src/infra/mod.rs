//! Infrastructure Layer
//!
//! Database-backed and in-memory implementations of the domain seams.

pub mod memory;
pub mod nonce_registry;
pub mod postgres;
pub mod revocation;

pub use memory::InMemoryUserRepository;
pub use nonce_registry::NonceRegistry;
pub use postgres::PgUserRepository;
pub use revocation::InMemoryRevocationStore;
