//! PostgreSQL Repository Implementations

use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    credentials::{PasswordHash, Salt},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user lookup
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.id,
                u.name,
                u.role,
                u.password_hash,
                s.salt
            FROM users u
            JOIN salts s ON s.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_name(&self, user_name: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.id,
                u.name,
                u.role,
                u.password_hash,
                s.salt
            FROM users u
            JOIN salts s ON s.user_id = u.id
            WHERE u.name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    role: String,
    password_hash: String,
    salt: String,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_role = UserRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid user role: {}", self.role)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.id),
            user_name: self.name,
            user_role,
            password_hash: PasswordHash::new(self.password_hash),
            salt: Salt::new(self.salt),
        })
    }
}
