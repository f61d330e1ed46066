//! In-Memory User Repository
//!
//! For tests and local development without a database.

use std::sync::Arc;

use dashmap::DashMap;
use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.user_id, user);
    }

    pub fn remove(&self, user_id: &UserId) -> Option<User> {
        self.users.remove(user_id).map(|(_, user)| user)
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn find_by_name(&self, user_name: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.user_name == user_name)
            .map(|entry| entry.value().clone()))
    }
}
