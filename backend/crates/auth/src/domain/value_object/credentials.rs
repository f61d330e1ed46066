//! Stored Credential Material
//!
//! The salt and password hash are produced elsewhere and only read here.
//! The hash is key material for proof verification, so it is wiped on drop
//! and never printed.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Stored password hash (already salted by the client-side scheme)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// Per-user salt, handed to the client in the challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt(String);

impl Salt {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
