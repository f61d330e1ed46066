//! Integration-style tests for the auth crate
//! Protocol scenarios run against the in-memory user repository.

#[cfg(test)]
mod fixtures {
    use kernel::id::UserId;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::user::User;
    use crate::domain::value_object::credentials::{PasswordHash, Salt};
    use crate::domain::value_object::user_role::UserRole;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::presentation::handlers::AuthAppState;

    pub fn user(name: &str, salt: &str, hash: &str) -> User {
        User {
            user_id: UserId::new(),
            user_name: name.to_string(),
            user_role: UserRole::Default,
            password_hash: PasswordHash::new(hash),
            salt: Salt::new(salt),
        }
    }

    /// State with one user `u` (salt "s1", hash "h1")
    pub fn state_with_user() -> (AuthAppState<InMemoryUserRepository>, UserId) {
        state_with_config(&AuthConfig::default())
    }

    pub fn state_with_config(
        config: &AuthConfig,
    ) -> (AuthAppState<InMemoryUserRepository>, UserId) {
        let users = InMemoryUserRepository::new();
        let u = user("u", "s1", "h1");
        let user_id = u.user_id;
        users.insert(u);
        (AuthAppState::new(users, config).unwrap(), user_id)
    }
}

#[cfg(test)]
mod runtime_tests {
    use std::time::Duration;

    use crate::application::config::AuthConfig;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::presentation::handlers::AuthAppState;

    #[tokio::test]
    async fn test_zero_sweep_interval_rejected_at_startup() {
        let config = AuthConfig {
            nonce_sweep_interval: Duration::ZERO,
            ..AuthConfig::default()
        };
        assert!(AuthAppState::new(InMemoryUserRepository::new(), &config).is_err());
    }

    #[tokio::test]
    async fn test_zero_prune_interval_rejected_at_startup() {
        let config = AuthConfig {
            revocation_prune_interval: Duration::ZERO,
            ..AuthConfig::default()
        };
        assert!(AuthAppState::new(InMemoryUserRepository::new(), &config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_runs_for_valid_config() {
        let config = AuthConfig {
            nonce_ttl: Duration::from_secs(5),
            nonce_sweep_interval: Duration::from_secs(1),
            ..AuthConfig::default()
        };
        let state = AuthAppState::new(InMemoryUserRepository::new(), &config).unwrap();
        for _ in 0..10 {
            state.nonces.create_nonce(kernel::id::UserId::new());
        }

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(state.nonces.is_empty());
    }
}

#[cfg(test)]
mod protocol_tests {
    use std::time::Duration;

    use kernel::id::UserId;

    use super::fixtures::{state_with_config, state_with_user};
    use crate::application::authenticate::{AuthenticateInput, AuthenticateUseCase};
    use crate::application::config::AuthConfig;
    use crate::application::issue_challenge::IssueChallengeUseCase;
    use crate::application::lookup_user::LookupUserIdUseCase;
    use crate::application::refresh::RefreshUseCase;
    use crate::application::sign_out::SignOutUseCase;
    use crate::domain::entity::token::TokenKind;
    use crate::domain::service::proof::compute_proof;
    use crate::domain::value_object::credentials::PasswordHash;
    use crate::error::AuthError;

    #[tokio::test(start_paused = true)]
    async fn test_challenge_then_authenticate_once() {
        let (state, u) = state_with_user();
        let challenge = IssueChallengeUseCase::new(state.users.clone(), state.nonces.clone());
        let login = AuthenticateUseCase::new(
            state.users.clone(),
            state.nonces.clone(),
            state.tokens.clone(),
        );

        let issued = challenge.execute(u).await.unwrap();
        assert_eq!(issued.salt, "s1");

        let proof = compute_proof(&PasswordHash::new("h1"), &issued.nonce);
        let pair = login
            .execute(AuthenticateInput {
                user_id: u,
                proof: proof.clone(),
            })
            .await
            .unwrap();
        assert!(state.tokens.validate(&pair.access_token));
        assert_eq!(state.tokens.identity_of(&pair.access_token).unwrap(), u);

        // nonce already consumed
        let replay = login.execute(AuthenticateInput { user_id: u, proof }).await;
        assert!(matches!(replay, Err(AuthError::InvalidChallenge)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_proof_consumes_nonce() {
        let (state, u) = state_with_user();
        let challenge = IssueChallengeUseCase::new(state.users.clone(), state.nonces.clone());
        let login = AuthenticateUseCase::new(
            state.users.clone(),
            state.nonces.clone(),
            state.tokens.clone(),
        );

        let issued = challenge.execute(u).await.unwrap();
        let wrong = compute_proof(&PasswordHash::new("h2"), &issued.nonce);
        let result = login
            .execute(AuthenticateInput {
                user_id: u,
                proof: wrong,
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        let right = compute_proof(&PasswordHash::new("h1"), &issued.nonce);
        let retry = login
            .execute(AuthenticateInput {
                user_id: u,
                proof: right,
            })
            .await;
        assert!(matches!(retry, Err(AuthError::InvalidChallenge)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_nonce_proof_rejected() {
        let (state, u) = state_with_user();
        let challenge = IssueChallengeUseCase::new(state.users.clone(), state.nonces.clone());
        let login = AuthenticateUseCase::new(
            state.users.clone(),
            state.nonces.clone(),
            state.tokens.clone(),
        );

        let first = challenge.execute(u).await.unwrap();
        let _second = challenge.execute(u).await.unwrap();

        let stale = compute_proof(&PasswordHash::new("h1"), &first.nonce);
        let result = login
            .execute(AuthenticateInput {
                user_id: u,
                proof: stale,
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_challenge() {
        // sweep far apart so the record is still there to be reported
        let (state, u) = state_with_config(&AuthConfig {
            nonce_sweep_interval: Duration::from_secs(3_600),
            ..AuthConfig::default()
        });
        let challenge = IssueChallengeUseCase::new(state.users.clone(), state.nonces.clone());
        let login = AuthenticateUseCase::new(
            state.users.clone(),
            state.nonces.clone(),
            state.tokens.clone(),
        );

        let issued = challenge.execute(u).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;

        let proof = compute_proof(&PasswordHash::new("h1"), &issued.nonce);
        let result = login.execute(AuthenticateInput { user_id: u, proof }).await;
        assert!(matches!(result, Err(AuthError::ChallengeExpired)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_user_cannot_get_challenge() {
        let (state, _) = state_with_user();
        let challenge = IssueChallengeUseCase::new(state.users.clone(), state.nonces.clone());

        let result = challenge.execute(UserId::new()).await;
        assert!(matches!(result, Err(AuthError::UnknownUser)));
        assert!(state.nonces.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_user_id_by_name() {
        let (state, u) = state_with_user();
        let lookup = LookupUserIdUseCase::new(state.users.clone());

        assert_eq!(lookup.execute("u").await.unwrap(), u);
        assert!(matches!(
            lookup.execute("nobody").await,
            Err(AuthError::UnknownUser)
        ));
        assert!(matches!(lookup.execute("  ").await, Err(AuthError::UnknownUser)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_rotates_and_revokes() {
        let (state, u) = state_with_user();
        let refresh = RefreshUseCase::new(state.users.clone(), state.tokens.clone());
        let original = state.tokens.issue_pair(u).unwrap();

        let rotated = refresh.execute(&original.refresh_token).await.unwrap();
        assert!(state.tokens.validate(&rotated.access_token));
        assert_eq!(state.tokens.identity_of(&rotated.access_token).unwrap(), u);
        assert!(
            state
                .tokens
                .verify(&rotated.refresh_token, TokenKind::Refresh)
                .is_ok()
        );

        let replay = refresh.execute(&original.refresh_token).await;
        assert!(matches!(replay, Err(AuthError::InvalidToken)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_rejects_access_token_and_garbage() {
        let (state, u) = state_with_user();
        let refresh = RefreshUseCase::new(state.users.clone(), state.tokens.clone());
        let pair = state.tokens.issue_pair(u).unwrap();

        assert!(matches!(
            refresh.execute(&pair.access_token).await,
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            refresh.execute("garbage").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_for_removed_user() {
        let (state, u) = state_with_user();
        let refresh = RefreshUseCase::new(state.users.clone(), state.tokens.clone());
        let pair = state.tokens.issue_pair(u).unwrap();

        state.users.remove(&u);
        assert!(matches!(
            refresh.execute(&pair.refresh_token).await,
            Err(AuthError::UnknownUser)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_revokes_and_is_idempotent() {
        let (state, u) = state_with_user();
        let refresh = RefreshUseCase::new(state.users.clone(), state.tokens.clone());
        let sign_out = SignOutUseCase::new(state.tokens.clone());
        let pair = state.tokens.issue_pair(u).unwrap();

        sign_out.execute(Some(&pair.refresh_token));
        sign_out.execute(Some(&pair.refresh_token));
        sign_out.execute(Some("garbage"));
        sign_out.execute(None);

        assert!(matches!(
            refresh.execute(&pair.refresh_token).await,
            Err(AuthError::InvalidToken)
        ));
        assert_eq!(state.revocations.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refresh_rotates_once() {
        let (state, u) = state_with_user();
        let pair = state.tokens.issue_pair(u).unwrap();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let state = state.clone();
            let token = pair.refresh_token.clone();
            tasks.push(tokio::spawn(async move {
                RefreshUseCase::new(state.users.clone(), state.tokens.clone())
                    .execute(&token)
                    .await
                    .is_ok()
            }));
        }

        let mut rotated = 0;
        for task in tasks {
            if task.await.unwrap() {
                rotated += 1;
            }
        }
        assert_eq!(rotated, 1);
        state.shutdown();
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::{Extension, Json};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::fixtures::state_with_user;
    use crate::domain::service::proof::compute_proof;
    use crate::domain::value_object::credentials::PasswordHash;
    use crate::error::AUTH_FAILED_MESSAGE;
    use crate::presentation::dto::{ChallengeResponse, TokenResponse};
    use crate::presentation::middleware::{AuthStatus, Identity, attach_identity, require_identity};
    use crate::presentation::router::auth_router;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_login_flow_over_http() {
        let (state, u) = state_with_user();
        let app = auth_router(state);

        let response = app
            .clone()
            .oneshot(get_request("/user-id?userName=u"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["userId"], json!(u.to_string()));

        let response = app
            .clone()
            .oneshot(get_request(&format!("/challenge?userId={u}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let challenge: ChallengeResponse =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(challenge.salt, "s1");

        let proof = compute_proof(&PasswordHash::new("h1"), &challenge.nonce);
        let login_body = json!({ "userId": u, "passwordHash": proof });

        let response = app
            .clone()
            .oneshot(post_json("/login", login_body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let tokens: TokenResponse = serde_json::from_value(body_json(response).await).unwrap();

        // replay of the same proof
        let response = app
            .clone()
            .oneshot(post_json("/login", login_body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(post_json(
                "/refresh",
                json!({ "refreshToken": tokens.refresh_token }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rotated: TokenResponse = serde_json::from_value(body_json(response).await).unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                "/logout",
                json!({ "refreshToken": rotated.refresh_token }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["resultCode"], json!(0));

        let response = app
            .oneshot(post_json(
                "/refresh",
                json!({ "refreshToken": rotated.refresh_token }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_share_one_response_body() {
        let (state, u) = state_with_user();
        let app = auth_router(state);

        let unknown_name = app
            .clone()
            .oneshot(get_request("/user-id?userName=nobody"))
            .await
            .unwrap();
        let unknown_user = app
            .clone()
            .oneshot(get_request(&format!(
                "/challenge?userId={}",
                kernel::id::UserId::new()
            )))
            .await
            .unwrap();
        let no_challenge = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({ "userId": u, "passwordHash": "x" }),
            ))
            .await
            .unwrap();
        let bad_token = app
            .oneshot(post_json("/refresh", json!({ "refreshToken": "x" })))
            .await
            .unwrap();

        for response in [unknown_name, unknown_user, no_challenge, bad_token] {
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = body_json(response).await;
            assert_eq!(body["detail"], json!(AUTH_FAILED_MESSAGE));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_without_body_succeeds() {
        let (state, _) = state_with_user();
        let response = auth_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    fn protected_app(state: &crate::AuthAppState<crate::InMemoryUserRepository>) -> Router {
        let whoami = Router::new()
            .route(
                "/me",
                get(|Extension(identity): Extension<Identity>| async move {
                    Json(json!({ "userId": identity.user_id }))
                }),
            )
            .layer(from_fn_with_state(state.tokens.clone(), require_identity));

        let status = Router::new()
            .route(
                "/status",
                get(|Extension(status): Extension<AuthStatus>| async move {
                    Json(json!({ "authenticated": status.is_authenticated }))
                }),
            )
            .layer(from_fn_with_state(state.tokens.clone(), attach_identity));

        whoami.merge(status)
    }

    fn with_bearer(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_require_identity_accepts_access_tokens_only() {
        let (state, u) = state_with_user();
        let pair = state.tokens.issue_pair(u).unwrap();
        let app = protected_app(&state);

        let ok = app
            .clone()
            .oneshot(with_bearer("/me", &pair.access_token))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(body_json(ok).await["userId"], json!(u.to_string()));

        let refresh_as_bearer = app
            .clone()
            .oneshot(with_bearer("/me", &pair.refresh_token))
            .await
            .unwrap();
        assert_eq!(refresh_as_bearer.status(), StatusCode::UNAUTHORIZED);

        let missing = app.oneshot(get_request("/me")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_identity_never_rejects() {
        let (state, u) = state_with_user();
        let pair = state.tokens.issue_pair(u).unwrap();
        let app = protected_app(&state);

        let anonymous = app
            .clone()
            .oneshot(with_bearer("/status", "forged.token.value"))
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::OK);
        assert_eq!(body_json(anonymous).await["authenticated"], json!(false));

        let authenticated = app
            .oneshot(with_bearer("/status", &pair.access_token))
            .await
            .unwrap();
        assert_eq!(body_json(authenticated).await["authenticated"], json!(true));
    }
}
