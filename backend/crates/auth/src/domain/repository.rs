//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::error::AuthResult;

/// Read-only user lookup
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find user (with salt) by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user (with salt) by user name
    async fn find_by_name(&self, user_name: &str) -> AuthResult<Option<User>>;
}

/// Denylist of refresh tokens revoked before their natural expiry.
///
/// Entries are keyed by the token's `jti` and may be forgotten once the token
/// itself would have expired (`expires_at`, Unix seconds).
pub trait RevocationStore: Send + Sync {
    /// Record a revocation. Returns `false` if the token was already revoked.
    fn revoke(&self, jti: Uuid, expires_at: i64) -> bool;

    fn is_revoked(&self, jti: &Uuid) -> bool;
}
