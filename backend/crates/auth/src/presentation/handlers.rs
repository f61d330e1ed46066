//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use kernel::error::app_error::AppResult;

use crate::application::authenticate::{AuthenticateInput, AuthenticateUseCase};
use crate::application::config::AuthConfig;
use crate::application::issue_challenge::IssueChallengeUseCase;
use crate::application::lookup_user::LookupUserIdUseCase;
use crate::application::refresh::RefreshUseCase;
use crate::application::sign_out::SignOutUseCase;
use crate::application::token::TokenProcessor;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::infra::nonce_registry::NonceRegistry;
use crate::infra::revocation::InMemoryRevocationStore;
use crate::presentation::dto::{
    ChallengeQuery, ChallengeResponse, LoginRequest, LogoutRequest, LogoutResponse,
    RefreshRequest, TokenResponse, UserIdQuery, UserIdResponse,
};

/// Shared state for auth handlers
///
/// Owns the process-wide nonce registry, token processor and denylist.
pub struct AuthAppState<U> {
    pub users: Arc<U>,
    pub nonces: Arc<NonceRegistry>,
    pub tokens: Arc<TokenProcessor>,
    pub revocations: Arc<InMemoryRevocationStore>,
}

impl<U> Clone for AuthAppState<U> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            nonces: self.nonces.clone(),
            tokens: self.tokens.clone(),
            revocations: self.revocations.clone(),
        }
    }
}

impl<U> AuthAppState<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    /// Validate `config`, build the auth runtime and start its background
    /// sweeps. Requires a tokio runtime.
    pub fn new(users: U, config: &AuthConfig) -> AppResult<Self> {
        config.validate()?;

        let nonces = NonceRegistry::new(config.nonce_ttl, config.nonce_sweep_interval)?;
        let revocations = Arc::new(InMemoryRevocationStore::new());
        revocations.start_pruning(config.revocation_prune_interval)?;

        Ok(Self {
            users: Arc::new(users),
            nonces: Arc::new(nonces),
            tokens: Arc::new(TokenProcessor::new(config, revocations.clone())),
            revocations,
        })
    }

    /// Stop background sweeps and drop all in-memory auth state.
    pub fn shutdown(&self) {
        self.nonces.shutdown();
        self.revocations.shutdown();
        tracing::info!("Auth runtime shut down");
    }
}

/// GET /api/auth/user-id?userName=
pub async fn lookup_user_id<U>(
    State(state): State<AuthAppState<U>>,
    Query(query): Query<UserIdQuery>,
) -> AuthResult<Json<UserIdResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = LookupUserIdUseCase::new(state.users.clone());
    let user_id = use_case.execute(&query.user_name).await?;

    Ok(Json(UserIdResponse { user_id }))
}

/// GET /api/auth/challenge?userId=
pub async fn issue_challenge<U>(
    State(state): State<AuthAppState<U>>,
    Query(query): Query<ChallengeQuery>,
) -> AuthResult<Json<ChallengeResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = IssueChallengeUseCase::new(state.users.clone(), state.nonces.clone());
    let output = use_case.execute(query.user_id).await?;

    Ok(Json(ChallengeResponse {
        salt: output.salt,
        nonce: output.nonce,
    }))
}

/// POST /api/auth/login
pub async fn login<U>(
    State(state): State<AuthAppState<U>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = AuthenticateUseCase::new(
        state.users.clone(),
        state.nonces.clone(),
        state.tokens.clone(),
    );

    let input = AuthenticateInput {
        user_id: req.user_id,
        proof: req.password_hash,
    };

    let pair = use_case.execute(input).await?;
    Ok(Json(pair.into()))
}

/// POST /api/auth/refresh
pub async fn refresh<U>(
    State(state): State<AuthAppState<U>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(state.users.clone(), state.tokens.clone());
    let pair = use_case.execute(&req.refresh_token).await?;
    Ok(Json(pair.into()))
}

/// POST /api/auth/logout
///
/// Always 200, whatever the token.
pub async fn logout<U>(
    State(state): State<AuthAppState<U>>,
    body: Option<Json<LogoutRequest>>,
) -> Json<LogoutResponse>
where
    U: UserRepository + Send + Sync + 'static,
{
    let req = body.map(|Json(req)| req).unwrap_or_default();

    SignOutUseCase::new(state.tokens.clone()).execute(req.refresh_token.as_deref());

    Json(LogoutResponse {
        result_code: 0,
        message: "Signed out".to_string(),
    })
}
