//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod issue_challenge;
pub mod lookup_user;
pub mod refresh;
pub mod sign_out;
pub mod token;

// Re-exports
pub use authenticate::{AuthenticateInput, AuthenticateUseCase};
pub use config::{AuthConfig, SigningSecret};
pub use issue_challenge::{ChallengeOutput, IssueChallengeUseCase};
pub use lookup_user::LookupUserIdUseCase;
pub use refresh::RefreshUseCase;
pub use sign_out::SignOutUseCase;
pub use token::TokenProcessor;
