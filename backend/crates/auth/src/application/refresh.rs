//! Refresh Use Case
//!
//! Rotates a refresh token into a fresh pair. The presented token is revoked
//! as part of the rotation, so it cannot be replayed.

use std::sync::Arc;

use crate::application::token::TokenProcessor;
use crate::domain::entity::token::{TokenKind, TokenPair};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenProcessor>,
}

impl<U> RefreshUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenProcessor>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        let user = self
            .user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        // Concurrent refreshes with the same token: only the revoking call rotates.
        if !self.tokens.revoke_claims(&claims) {
            return Err(AuthError::InvalidToken);
        }

        let pair = self.tokens.issue_pair(user.user_id)?;

        tracing::info!(user_id = %user.user_id, "Tokens refreshed");

        Ok(pair)
    }
}
