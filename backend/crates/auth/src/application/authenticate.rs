//! Authenticate Use Case
//!
//! Verifies a challenge proof and issues a token pair.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::token::TokenProcessor;
use crate::domain::entity::token::TokenPair;
use crate::domain::repository::UserRepository;
use crate::domain::service::proof::verify_proof;
use crate::error::{AuthError, AuthResult};
use crate::infra::nonce_registry::NonceRegistry;

pub struct AuthenticateInput {
    pub user_id: UserId,
    /// Base64 HMAC of the nonce keyed by the password hash
    pub proof: String,
}

pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    nonces: Arc<NonceRegistry>,
    tokens: Arc<TokenProcessor>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, nonces: Arc<NonceRegistry>, tokens: Arc<TokenProcessor>) -> Self {
        Self {
            user_repo,
            nonces,
            tokens,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AuthResult<TokenPair> {
        let user = self
            .user_repo
            .find_by_id(&input.user_id)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        // Consumed here whether or not the proof matches
        let nonce = self.nonces.get_nonce(&user.user_id)?;

        if !verify_proof(&user.password_hash, &nonce, &input.proof) {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.tokens.issue_pair(user.user_id)?;

        tracing::info!(user_id = %user.user_id, role = %user.user_role, "User authenticated");

        Ok(pair)
    }
}
