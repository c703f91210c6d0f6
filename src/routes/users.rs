use anyhow::Context;
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    auth::{Role, password},
    extract::{AppJson, AppPath},
    middleware::{self, AuthUser},
    models::{NewUser, UserChanges, UserEntity},
    routes::{EmptyListPolicy, ensure_changes, ensure_found},
    validation::{
        non_blank, present, reject_blank, require_fields, validate_email, validate_phone_number,
        validate_province,
    },
};

const USERS_EMPTY: EmptyListPolicy = EmptyListPolicy::Ok;

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(get_users))
        .routes(routes!(get_user))
        .routes(routes!(create_user))
        .routes(routes!(login_user));

    let owner = OpenApiRouter::new()
        .routes(routes!(update_user))
        .routes(routes!(delete_user))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::users_authorization,
        ));

    public.merge(owner)
}

#[derive(Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub gmaplink: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateUserRes {
    pub message: String,
    pub user_id: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LoginRes {
    pub message: String,
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateUserReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub gmaplink: Option<String>,
}

impl UpdateUserReq {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.phone_number1.is_none()
            && self.phone_number2.is_none()
            && self.street_address.is_none()
            && self.city.is_none()
            && self.province.is_none()
            && self.country.is_none()
            && self.gmaplink.is_none()
    }
}

/// Shared by create and update: phone numbers and province are checked only when supplied.
fn validate_contact(
    email: Option<&str>,
    phone_number1: Option<&str>,
    phone_number2: Option<&str>,
    province: Option<&str>,
) -> Result<(), AppError> {
    if let Some(email) = email {
        validate_email(email)?;
    }
    if let Some(number) = phone_number1 {
        validate_phone_number(1, number)?;
    }
    if let Some(number) = phone_number2 {
        validate_phone_number(2, number)?;
    }
    if let Some(province) = province {
        validate_province(province)?;
    }
    Ok(())
}

/// List every registered user.
#[utoipa::path(
    get,
    path = "/get_users",
    tags = ["Users"],
    responses(
        (status = 200, description = "All users", body = Vec<UserEntity>)
    )
)]
async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = state.store.list_users().await?;
    USERS_EMPTY.respond(users)
}

#[utoipa::path(
    get,
    path = "/get_user/{id}",
    tags = ["Users"],
    params(
        ("id" = i32, Path, description = "User ID to fetch")
    ),
    responses(
        (status = 200, description = "User found", body = UserEntity),
        (status = 404, description = "User not found", body = MessageRes)
    )
)]
async fn get_user(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found or deleted".to_string()))?;

    Ok(Json(user))
}

/// Register a new user. Duplicate emails are rejected by the unique index.
#[utoipa::path(
    post,
    path = "/create_user",
    tags = ["Users"],
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "User created", body = CreateUserRes),
        (status = 400, description = "Invalid payload or duplicate email", body = MessageRes)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateUserReq>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("first_name", present(&req.first_name)),
        ("last_name", present(&req.last_name)),
        ("email", present(&req.email)),
        ("password", present(&req.password)),
        ("street_address", present(&req.street_address)),
        ("city", present(&req.city)),
        ("province", present(&req.province)),
        ("country", present(&req.country)),
    ])?;

    let phone_number1 = non_blank(req.phone_number1);
    let phone_number2 = non_blank(req.phone_number2);
    validate_contact(
        req.email.as_deref(),
        phone_number1.as_deref(),
        phone_number2.as_deref(),
        req.province.as_deref(),
    )?;

    let password_hash = password::hash_password(&req.password.unwrap_or_default())
        .context("Failed to hash password")?;

    let user_id = state
        .store
        .create_user(NewUser {
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password_hash,
            phone_number1,
            phone_number2,
            street_address: req.street_address.unwrap_or_default(),
            city: req.city.unwrap_or_default(),
            province: req.province.unwrap_or_default(),
            country: req.country.unwrap_or_default(),
            gmaplink: non_blank(req.gmaplink),
        })
        .await
        .map_err(|err| err.or_conflict("Email already exists"))?;

    tracing::info!(user_id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(CreateUserRes {
            message: "User created successfully".to_string(),
            user_id,
        }),
    ))
}

/// Exchange email and password for a user session token.
#[utoipa::path(
    post,
    path = "/loginUser",
    tags = ["Users"],
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = LoginRes),
        (status = 401, description = "Invalid credentials", body = MessageRes)
    )
)]
async fn login_user(
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
        .find_user_credentials(&email)
        .await?
        .ok_or_else(invalid)?;
    if !password::verify_password(&plaintext, &credentials.password_hash) {
        tracing::warn!(user_id = credentials.user_id, "Failed user login");
        return Err(invalid());
    }

    state.store.touch_user_login(credentials.user_id).await?;
    let token = state
        .jwt
        .issue_token(credentials.user_id, Role::User)
        .context("Failed to issue user token")?;

    Ok(Json(LoginRes {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Update the supplied fields of a user. Callers may only update themselves unless admin.
#[utoipa::path(
    put,
    path = "/update_user/{id}",
    tags = ["Users"],
    params(
        ("id" = i32, Path, description = "User ID to update")
    ),
    request_body = UpdateUserReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "User updated", body = MessageRes),
        (status = 400, description = "Invalid or empty payload", body = MessageRes),
        (status = 403, description = "Not the account owner", body = MessageRes),
        (status = 404, description = "User not found", body = MessageRes)
    )
)]
async fn update_user(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(mut req): AppJson<UpdateUserReq>,
) -> Result<impl IntoResponse, AppError> {
    middleware::require_ownership(Some(id), &caller, "Access denied to this user")?;

    // Blank optional columns mean "not supplied", as on create.
    req.phone_number1 = non_blank(req.phone_number1);
    req.phone_number2 = non_blank(req.phone_number2);
    req.gmaplink = non_blank(req.gmaplink);
    ensure_changes(req.is_empty())?;

    reject_blank(&[
        ("first_name", &req.first_name),
        ("last_name", &req.last_name),
        ("email", &req.email),
        ("password", &req.password),
        ("street_address", &req.street_address),
        ("city", &req.city),
        ("province", &req.province),
        ("country", &req.country),
    ])?;

    validate_contact(
        req.email.as_deref(),
        req.phone_number1.as_deref(),
        req.phone_number2.as_deref(),
        req.province.as_deref(),
    )?;

    let password_hash = match req.password.as_deref() {
        Some(plaintext) => {
            Some(password::hash_password(plaintext).context("Failed to hash password")?)
        }
        None => None,
    };

    let changes = UserChanges {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password_hash,
        phone_number1: req.phone_number1,
        phone_number2: req.phone_number2,
        street_address: req.street_address,
        city: req.city,
        province: req.province,
        country: req.country,
        gmaplink: req.gmaplink,
    };

    let updated = state
        .store
        .update_user(id, changes)
        .await
        .map_err(|err| err.or_conflict("Email already exists"))?;
    ensure_found(updated, "User not found")?;

    Ok(MessageRes::new("User updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/delete_user/{id}",
    tags = ["Users"],
    params(
        ("id" = i32, Path, description = "User ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "User deleted", body = MessageRes),
        (status = 403, description = "Not the account owner", body = MessageRes),
        (status = 404, description = "User not found", body = MessageRes)
    )
)]
async fn delete_user(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    middleware::require_ownership(Some(id), &caller, "Access denied to this user")?;

    let deleted = state.store.delete_user(id).await?;
    ensure_found(deleted, "User not found")?;

    tracing::info!(user_id = id, "User deleted");
    Ok(MessageRes::new("User permanently deleted"))
}
