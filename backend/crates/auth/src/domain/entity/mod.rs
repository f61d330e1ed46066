pub mod nonce;
pub mod token;
pub mod user;
