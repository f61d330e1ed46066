//! User Entity
//!
//! Read-only view of an account. Accounts are provisioned outside this crate.

use kernel::id::UserId;

use crate::domain::value_object::credentials::{PasswordHash, Salt};
use crate::domain::value_object::user_role::UserRole;

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub user_role: UserRole,
    pub password_hash: PasswordHash,
    pub salt: Salt,
}
