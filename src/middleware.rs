//! Request guards. Both middlewares attach the caller as an [`AuthUser`]
//! extension; handlers pull it out with `Extension<AuthUser>`.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::{
    app_error::AppError,
    app_state::AppState,
    auth::{JwtManager, Role, jwt::extract_bearer_token},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
}

fn resolve(jwt: &JwtManager, token: &str) -> Option<AuthUser> {
    let claims = jwt.verify_token(token).ok()?;
    let id = claims.subject_id().ok()?;
    Some(AuthUser {
        id,
        role: claims.role,
    })
}

/// Any signed-in caller, user or admin.
pub fn require_user(jwt: &JwtManager, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let Some(token) = bearer_token(headers) else {
        tracing::warn!("Rejected request without a bearer token");
        return Err(AppError::Unauthorized(
            "Authorization token missing or invalid".to_string(),
        ));
    };

    resolve(jwt, token).ok_or_else(|| {
        tracing::warn!("Rejected request with an invalid or expired token");
        AppError::ForbiddenResource("Invalid or expired token".to_string())
    })
}

pub fn require_admin(jwt: &JwtManager, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let Some(token) = bearer_token(headers) else {
        tracing::warn!("Rejected admin request without a bearer token");
        return Err(AppError::Unauthorized("Access token missing".to_string()));
    };

    let Some(caller) = resolve(jwt, token) else {
        tracing::warn!("Rejected admin request with an invalid or expired token");
        return Err(AppError::Unauthorized(
            "Invalid or expired token".to_string(),
        ));
    };

    if !caller.is_admin() {
        tracing::warn!(user_id = caller.id, "Rejected non-admin caller");
        return Err(AppError::ForbiddenResource(
            "Access forbidden: Admins only".to_string(),
        ));
    }

    Ok(caller)
}

/// Admins pass unconditionally. Users pass only when they own the resource;
/// a resource that resolved to no owner is treated like someone else's.
pub fn require_ownership(
    owner_id: Option<i32>,
    caller: &AuthUser,
    message: &str,
) -> Result<(), AppError> {
    if caller.is_admin() || owner_id == Some(caller.id) {
        return Ok(());
    }

    tracing::warn!(user_id = caller.id, ?owner_id, "Ownership check failed");
    Err(AppError::ForbiddenResource(message.to_string()))
}

pub async fn users_authorization(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let caller = require_user(&state.jwt, req.headers())?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

pub async fn admins_authorization(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let caller = require_admin(&state.jwt, req.headers())?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
