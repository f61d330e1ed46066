//! Auth Middleware
//!
//! Bearer-token identity for protected routes. Only access tokens establish
//! an identity; a refresh token presented as a bearer token does not.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::UserId;

use crate::application::token::TokenProcessor;
use crate::domain::entity::token::TokenKind;
use crate::error::AuthError;

/// Authenticated caller, stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
}

/// Authentication status stored in request extensions
#[derive(Debug, Clone, Copy)]
pub struct AuthStatus {
    pub is_authenticated: bool,
}

/// Middleware that establishes an identity when it can and never rejects.
///
/// Missing, malformed, expired and forged tokens all leave the request
/// anonymous.
pub async fn attach_identity(
    State(tokens): State<Arc<TokenProcessor>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let identity = identify(&tokens, req.headers());

    req.extensions_mut().insert(AuthStatus {
        is_authenticated: identity.is_some(),
    });
    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

/// Middleware that requires a valid access token
pub async fn require_identity(
    State(tokens): State<Arc<TokenProcessor>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some(identity) = identify(&tokens, req.headers()) else {
        return Err(AuthError::InvalidToken.into_response());
    };

    req.extensions_mut().insert(AuthStatus {
        is_authenticated: true,
    });
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn identify(tokens: &TokenProcessor, headers: &HeaderMap) -> Option<Identity> {
    let token = bearer_token(headers)?;
    tokens
        .verify(token, TokenKind::Access)
        .ok()
        .map(|claims| Identity {
            user_id: claims.sub,
        })
}

/// Extract the token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
