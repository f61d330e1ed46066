//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary every backend crate agrees on:
//! - The unified error type ([`error::app_error::AppError`]) and its classification
//! - Typed identifiers ([`id::UserId`], [`id::CacheKey`])
//!
//! **Design Principle**: only things whose meaning is identical in the auth
//! domain, the staging domain and the HTTP edge belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
