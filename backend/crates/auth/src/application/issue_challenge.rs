//! Issue Challenge Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::infra::nonce_registry::NonceRegistry;

/// Output DTO for issue challenge
#[derive(Debug, Clone)]
pub struct ChallengeOutput {
    pub salt: String,
    pub nonce: String,
}

/// Issue Challenge Use Case
///
/// Hands the client its salt and a fresh single-use nonce. Any earlier
/// outstanding nonce for the same user stops working.
pub struct IssueChallengeUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    nonces: Arc<NonceRegistry>,
}

impl<U> IssueChallengeUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, nonces: Arc<NonceRegistry>) -> Self {
        Self { user_repo, nonces }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<ChallengeOutput> {
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        let nonce = self.nonces.create_nonce(user.user_id);

        tracing::info!(user_id = %user.user_id, "Issued challenge");

        Ok(ChallengeOutput {
            salt: user.salt.into_inner(),
            nonce,
        })
    }
}
