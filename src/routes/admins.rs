use anyhow::Context;
use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    auth::{Role, password},
    extract::{AppJson, AppPath},
    middleware::{self, AuthUser},
    models::{AdminChanges, AdminEntity, NewAdmin},
    routes::{
        EmptyListPolicy, ensure_changes, ensure_found,
        users::{LoginReq, LoginRes},
    },
    validation::{present, require_fields, validate_email},
};

const ADMINS_EMPTY: EmptyListPolicy = EmptyListPolicy::NotFound("No admins found");

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(login_admin))
        .routes(routes!(create_admin));

    let guarded = OpenApiRouter::new()
        .routes(routes!(get_all_admins))
        .routes(routes!(get_admin_by_id))
        .routes(routes!(change_admin_password))
        .routes(routes!(update_admin_info))
        .routes(routes!(delete_admin))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    public.merge(guarded)
}

#[derive(Deserialize, ToSchema)]
pub struct CreateAdminReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateAdminRes {
    pub message: String,
    pub admin_id: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangePasswordReq {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAdminReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[utoipa::path(
    get,
    path = "/getAllAdmins",
    tags = ["Admins"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All admins", body = Vec<AdminEntity>),
        (status = 404, description = "No admins found", body = MessageRes)
    )
)]
async fn get_all_admins(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let admins = state.store.list_admins().await?;
    ADMINS_EMPTY.respond(admins)
}

#[utoipa::path(
    get,
    path = "/getAdminById/{id}",
    tags = ["Admins"],
    params(
        ("id" = i32, Path, description = "Admin ID to fetch")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Admin found", body = AdminEntity),
        (status = 404, description = "Admin not found", body = MessageRes)
    )
)]
async fn get_admin_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let admin = state
        .store
        .get_admin(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(admin))
}

/// Exchange email and password for an admin session token.
#[utoipa::path(
    post,
    path = "/loginAdmin",
    tags = ["Admins"],
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = LoginRes),
        (status = 401, description = "Invalid credentials", body = MessageRes)
    )
)]
async fn login_admin(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginReq>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(plaintext)) = (req.email, req.password) else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
    let credentials = state
        .store
        .find_admin_credentials(&email)
        .await?
        .ok_or_else(invalid)?;
    if !password::verify_password(&plaintext, &credentials.password_hash) {
        tracing::warn!(admin_id = credentials.admin_id, "Failed admin login");
        return Err(invalid());
    }

    let token = state
        .jwt
        .issue_token(credentials.admin_id, Role::Admin)
        .context("Failed to issue admin token")?;

    Ok(Json(LoginRes {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Register an admin. Anyone may create the first admin; once one exists an
/// admin token is required.
#[utoipa::path(
    post,
    path = "/createAdmin",
    tags = ["Admins"],
    request_body = CreateAdminReq,
    security((), ("bearerAuth" = [])),
    responses(
        (status = 201, description = "Admin created", body = CreateAdminRes),
        (status = 400, description = "Invalid payload or duplicate email", body = MessageRes),
        (status = 401, description = "Admin token required", body = MessageRes),
        (status = 403, description = "Caller is not an admin", body = MessageRes)
    )
)]
async fn create_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(req): AppJson<CreateAdminReq>,
) -> Result<impl IntoResponse, AppError> {
    if state.store.has_admins().await? {
        middleware::require_admin(&state.jwt, &headers)?;
    } else {
        tracing::info!("Bootstrapping the first admin account");
    }

    require_fields(&[
        ("first_name", present(&req.first_name)),
        ("last_name", present(&req.last_name)),
        ("email", present(&req.email)),
        ("password", present(&req.password)),
    ])?;
    let email = req.email.unwrap_or_default();
    validate_email(&email)?;

    let password_hash = password::hash_password(&req.password.unwrap_or_default())
        .context("Failed to hash password")?;

    let admin_id = state
        .store
        .create_admin(NewAdmin {
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            email,
            password_hash,
        })
        .await
        .map_err(|err| err.or_conflict("Email already exists"))?;

    tracing::info!(admin_id, "Admin created");
    Ok((
        StatusCode::CREATED,
        Json(CreateAdminRes {
            message: "Admin created successfully".to_string(),
            admin_id,
        }),
    ))
}

/// Admins may only change their own password, and must prove the current one.
#[utoipa::path(
    put,
    path = "/changeAdminPassword/{id}",
    tags = ["Admins"],
    params(
        ("id" = i32, Path, description = "Admin ID whose password changes")
    ),
    request_body = ChangePasswordReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Password changed", body = MessageRes),
        (status = 401, description = "Current password is incorrect", body = MessageRes),
        (status = 403, description = "Another admin's account", body = MessageRes),
        (status = 404, description = "Admin not found", body = MessageRes)
    )
)]
async fn change_admin_password(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<ChangePasswordReq>,
) -> Result<impl IntoResponse, AppError> {
    if caller.id != id {
        return Err(AppError::ForbiddenResource(
            "Admins can only change their own password".to_string(),
        ));
    }
    let (Some(current), Some(new_password)) = (req.current_password, req.new_password) else {
        return Err(AppError::BadRequest(
            "Both current and new passwords are required".to_string(),
        ));
    };

    let stored_hash = state
        .store
        .get_admin_password_hash(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;
    if !password::verify_password(&current, &stored_hash) {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = password::hash_password(&new_password).context("Failed to hash password")?;
    let updated = state.store.set_admin_password(id, new_hash).await?;
    ensure_found(updated, "Admin not found")?;

    Ok(MessageRes::new("Password changed successfully"))
}

#[utoipa::path(
    put,
    path = "/updateAdminInfo/{id}",
    tags = ["Admins"],
    params(
        ("id" = i32, Path, description = "Admin ID to update")
    ),
    request_body = UpdateAdminReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Admin updated", body = MessageRes),
        (status = 400, description = "Invalid, empty or duplicate payload", body = MessageRes),
        (status = 404, description = "Admin not found", body = MessageRes)
    )
)]
async fn update_admin_info(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateAdminReq>,
) -> Result<impl IntoResponse, AppError> {
    let changes = AdminChanges {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
    };
    ensure_changes(changes.is_empty())?;
    if let Some(email) = &changes.email {
        validate_email(email)?;
    }

    let updated = state
        .store
        .update_admin(id, changes)
        .await
        .map_err(|err| err.or_conflict("Email already in use"))?;
    ensure_found(updated, "Admin not found")?;

    Ok(MessageRes::new("Admin updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/deleteAdmin/{id}",
    tags = ["Admins"],
    params(
        ("id" = i32, Path, description = "Admin ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Admin deleted", body = MessageRes),
        (status = 404, description = "Admin not found", body = MessageRes)
    )
)]
async fn delete_admin(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_admin(id).await?;
    ensure_found(deleted, "Admin not found")?;

    tracing::info!(admin_id = id, "Admin deleted");
    Ok(MessageRes::new("Admin deleted successfully"))
}
