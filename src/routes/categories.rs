use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath},
    middleware::{self, AuthUser},
    models::{CategoryChanges, CategoryEntity, NewCategory},
    routes::{EmptyListPolicy, ensure_changes, ensure_found},
    validation::{non_blank, present, require_fields},
};

const CATEGORIES_EMPTY: EmptyListPolicy = EmptyListPolicy::NotFound("No product categories found");

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(get_all_product_categories))
        .routes(routes!(get_single_category));

    let guarded = OpenApiRouter::new()
        .routes(routes!(create_category))
        .routes(routes!(update_category))
        .routes(routes!(delete_category))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    public.merge(guarded)
}

#[derive(Deserialize, ToSchema)]
pub struct CategoryReq {
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub parent_category_id: Option<i32>,
    pub admin_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateCategoryRes {
    pub message: String,
    pub category_id: i32,
}

#[utoipa::path(
    get,
    path = "/get_all_product_categories",
    tags = ["Categories"],
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryEntity>),
        (status = 404, description = "No categories", body = MessageRes)
    )
)]
async fn get_all_product_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.store.list_categories().await?;
    CATEGORIES_EMPTY.respond(categories)
}

#[utoipa::path(
    get,
    path = "/get_single_category/{id}",
    tags = ["Categories"],
    params(
        ("id" = i32, Path, description = "Category ID to fetch")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryEntity),
        (status = 404, description = "Category not found", body = MessageRes)
    )
)]
async fn get_single_category(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let category = state
        .store
        .get_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found or deleted".to_string()))?;

    Ok(Json(category))
}

#[utoipa::path(
    post,
    path = "/create_category",
    tags = ["Categories"],
    request_body = CategoryReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Category created", body = CreateCategoryRes),
        (status = 400, description = "Missing category name", body = MessageRes)
    )
)]
async fn create_category(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<CategoryReq>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[("category_name", present(&req.category_name))])?;

    let category_id = state
        .store
        .create_category(NewCategory {
            category_name: req.category_name.unwrap_or_default(),
            description: non_blank(req.description),
            parent_category_id: req.parent_category_id,
            admin_id: req.admin_id.or(Some(caller.id)),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCategoryRes {
            message: "Category created successfully".to_string(),
            category_id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/update_category/{id}",
    tags = ["Categories"],
    params(
        ("id" = i32, Path, description = "Category ID to update")
    ),
    request_body = CategoryReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Category updated", body = MessageRes),
        (status = 400, description = "Empty payload", body = MessageRes),
        (status = 404, description = "Category not found", body = MessageRes)
    )
)]
async fn update_category(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<CategoryReq>,
) -> Result<impl IntoResponse, AppError> {
    let mut changes = CategoryChanges {
        category_name: req.category_name,
        description: req.description,
        parent_category_id: req.parent_category_id,
        admin_id: req.admin_id,
    };
    ensure_changes(changes.is_empty())?;
    if changes.parent_category_id == Some(id) {
        return Err(AppError::BadRequest(
            "A category cannot be its own parent".to_string(),
        ));
    }
    changes.admin_id = changes.admin_id.or(Some(caller.id));

    let updated = state.store.update_category(id, changes).await?;
    ensure_found(updated, "Category not found")?;

    Ok(MessageRes::new("Category updated successfully"))
}

/// Hard delete. Child categories and products keep existing with a NULL reference.
#[utoipa::path(
    delete,
    path = "/delete_category/{id}",
    tags = ["Categories"],
    params(
        ("id" = i32, Path, description = "Category ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Category deleted", body = MessageRes),
        (status = 404, description = "Category not found", body = MessageRes)
    )
)]
async fn delete_category(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_category(id).await?;
    ensure_found(deleted, "Category not found")?;

    Ok(MessageRes::new("Category permanently deleted"))
}
