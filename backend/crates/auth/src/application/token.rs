//! Token Processor
//!
//! Issues and verifies HS256-signed access and refresh tokens.
//!
//! Structural validation is stateless: signature plus `now < exp`. Refresh
//! tokens additionally pass through the revocation denylist, which is the only
//! state consulted. Access tokens are short-lived and never denylisted.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::token::{TokenClaims, TokenKind, TokenPair};
use crate::domain::repository::RevocationStore;
use crate::error::{AuthError, AuthResult};

pub struct TokenProcessor {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    revocations: Arc<dyn RevocationStore>,
}

impl TokenProcessor {
    pub fn new(config: &AuthConfig, revocations: Arc<dyn RevocationStore>) -> Self {
        let secret = config.signing_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against an explicit clock in `verify_at`
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
            revocations,
        }
    }

    pub fn issue_access_token(&self, user_id: UserId) -> AuthResult<String> {
        self.issue_at(user_id, TokenKind::Access, Utc::now().timestamp())
    }

    pub fn issue_refresh_token(&self, user_id: UserId) -> AuthResult<String> {
        self.issue_at(user_id, TokenKind::Refresh, Utc::now().timestamp())
    }

    pub fn issue_pair(&self, user_id: UserId) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_access_token(user_id)?,
            refresh_token: self.issue_refresh_token(user_id)?,
        })
    }

    /// Issue a token as if the clock read `now` (Unix seconds).
    pub fn issue_at(&self, user_id: UserId, kind: TokenKind, now: i64) -> AuthResult<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = TokenClaims {
            sub: user_id,
            iat: now,
            exp: now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
            jti: Uuid::new_v4(),
            kind,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))
    }

    /// True iff signature and expiry check out (and, for refresh tokens, the
    /// token is not revoked). Never errors; any defect reads as invalid.
    pub fn validate(&self, token: &str) -> bool {
        self.claims_at(token, Utc::now().timestamp()).is_some()
    }

    /// Subject of a valid token of any kind.
    pub fn identity_of(&self, token: &str) -> AuthResult<UserId> {
        self.claims_at(token, Utc::now().timestamp())
            .map(|claims| claims.sub)
            .ok_or(AuthError::InvalidToken)
    }

    /// Verify a token that must be of `kind`.
    pub fn verify(&self, token: &str, kind: TokenKind) -> AuthResult<TokenClaims> {
        self.verify_at(token, kind, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, kind: TokenKind, now: i64) -> AuthResult<TokenClaims> {
        match self.claims_at(token, now) {
            Some(claims) if claims.kind == kind => Ok(claims),
            _ => Err(AuthError::InvalidToken),
        }
    }

    /// Put a refresh token on the denylist until its natural expiry.
    ///
    /// Returns `true` only for the call that actually revoked it. Invalid,
    /// expired, already revoked and access tokens are ignored.
    pub fn revoke(&self, refresh_token: &str) -> bool {
        match self.verify(refresh_token, TokenKind::Refresh) {
            Ok(claims) => self.revoke_claims(&claims),
            Err(_) => false,
        }
    }

    /// Revoke already verified refresh claims. See [`Self::revoke`].
    pub fn revoke_claims(&self, claims: &TokenClaims) -> bool {
        if claims.kind != TokenKind::Refresh {
            return false;
        }
        let revoked = self.revocations.revoke(claims.jti, claims.exp);
        if revoked {
            tracing::debug!(user_id = %claims.sub, jti = %claims.jti, "Refresh token revoked");
        }
        revoked
    }

    fn claims_at(&self, token: &str, now: i64) -> Option<TokenClaims> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| tracing::debug!(error = %e, "Token failed to decode"))
            .ok()?
            .claims;

        if claims.is_expired_at(now) {
            return None;
        }
        if claims.kind == TokenKind::Refresh && self.revocations.is_revoked(&claims.jti) {
            return None;
        }
        Some(claims)
    }
}
