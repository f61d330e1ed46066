//! Domain Layer
//!
//! Contains entities, value objects, repository traits and pure services.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::{
    nonce::NonceRecord,
    token::{TokenClaims, TokenKind, TokenPair},
    user::User,
};
pub use repository::{RevocationStore, UserRepository};
