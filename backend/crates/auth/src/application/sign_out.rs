//! Sign Out Use Case
//!
//! Best-effort revocation of a refresh token. Always succeeds for the caller.

use std::sync::Arc;

use crate::application::token::TokenProcessor;

pub struct SignOutUseCase {
    tokens: Arc<TokenProcessor>,
}

impl SignOutUseCase {
    pub fn new(tokens: Arc<TokenProcessor>) -> Self {
        Self { tokens }
    }

    pub fn execute(&self, refresh_token: Option<&str>) {
        let revoked = refresh_token.is_some_and(|token| self.tokens.revoke(token));
        tracing::info!(revoked, "User signed out");
    }
}
