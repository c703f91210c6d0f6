use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id or admin_id, depending on `role`)
    pub sub: String,

    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn subject_id(&self) -> Result<i32, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}

/// Signs and verifies HS256 session tokens with a server-held secret.
pub struct JwtManager {
    secret: String,
    admin_lifetime_secs: i64,
    user_lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(secret: String, admin_lifetime_secs: i64, user_lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            admin_lifetime_secs,
            user_lifetime_secs,
        }
    }

    /// Issue a token for `subject_id`; lifetime depends on the role.
    pub fn issue_token(&self, subject_id: i32, role: Role) -> Result<String, AuthError> {
        let lifetime = match role {
            Role::Admin => self.admin_lifetime_secs,
            Role::User => self.user_lifetime_secs,
        };
        let now = Utc::now();
        let exp = now + Duration::seconds(lifetime);

        let claims = Claims {
            sub: subject_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(AuthError::Sign)
    }

    /// Validate signature and expiry, returning the decoded claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(AuthError::InvalidToken)?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
