//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the auth router for any user repository implementation
pub fn auth_router<U>(state: AuthAppState<U>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/user-id", get(handlers::lookup_user_id::<U>))
        .route("/challenge", get(handlers::issue_challenge::<U>))
        .route("/login", post(handlers::login::<U>))
        .route("/refresh", post(handlers::refresh::<U>))
        .route("/logout", post(handlers::logout::<U>))
        .with_state(state)
}
