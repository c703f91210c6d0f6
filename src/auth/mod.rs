//! Password hashing and session tokens.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtManager, Role};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),

    #[error("Token subject is not a valid id: {0}")]
    InvalidSubject(String),
}
