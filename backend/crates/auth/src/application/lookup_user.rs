//! Lookup User Id Use Case
//!
//! Resolves a user name to the id the challenge flow is keyed by.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct LookupUserIdUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> LookupUserIdUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_name: &str) -> AuthResult<UserId> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(AuthError::UnknownUser);
        }

        self.user_repo
            .find_by_name(user_name)
            .await?
            .map(|user| user.user_id)
            .ok_or(AuthError::UnknownUser)
    }
}
