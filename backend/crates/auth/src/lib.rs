//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, proof computation
//! - `application/` - Token processor and one use case per protocol step
//! - `infra/` - Nonce registry, revocation denylist, user repositories
//! - `presentation/` - HTTP handlers, DTOs, router, bearer middleware
//!
//! ## Protocol
//! 1. `GET /user-id` resolves a user name to its id.
//! 2. `GET /challenge` returns the user's salt and a single-use nonce.
//! 3. The client derives its password hash from the salt and sends
//!    `Base64(HMAC-SHA256(hash, nonce))` to `POST /login`.
//! 4. The nonce is consumed; a matching proof yields an access/refresh pair.
//! 5. `POST /refresh` rotates the pair; `POST /logout` revokes the refresh token.
//!
//! ## Security Model
//! - The password hash never crosses the wire; proofs are compared in constant time
//! - Nonces are single use and expire after a short TTL
//! - Every authentication failure yields the same 401 body
//! - Refresh tokens are denylisted on logout and on rotation

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, SigningSecret};
pub use application::token::TokenProcessor;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, NonceRegistry, PgUserRepository};
pub use presentation::{
    AuthAppState, AuthStatus, Identity, attach_identity, auth_router, require_identity,
};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
