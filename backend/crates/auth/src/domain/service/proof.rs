//! Challenge Proof
//!
//! `proof = Base64(HMAC-SHA256(key = stored password hash, message = nonce))`
//!
//! The client derives the same password hash from its password and the salt
//! handed out with the challenge, so the hash itself never crosses the wire.
//!
//! The argument order is part of the wire contract: the password hash is the
//! HMAC key and the nonce is the message. Clients that key the HMAC with the
//! nonce and sign the hash produce a different proof and will not
//! authenticate.

use platform::crypto::{constant_time_eq, hmac_sha256, to_base64};

use crate::domain::value_object::credentials::PasswordHash;

pub fn compute_proof(password_hash: &PasswordHash, nonce: &str) -> String {
    to_base64(&hmac_sha256(password_hash.as_bytes(), nonce.as_bytes()))
}

/// Compare without short-circuiting on the first differing byte.
pub fn verify_proof(password_hash: &PasswordHash, nonce: &str, supplied: &str) -> bool {
    let expected = compute_proof(password_hash, nonce);
    constant_time_eq(expected.as_bytes(), supplied.as_bytes())
}
