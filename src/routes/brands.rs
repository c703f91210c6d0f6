use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath},
    middleware::{self, AuthUser},
    models::{BrandChanges, BrandEntity, NewBrand},
    routes::{EmptyListPolicy, ensure_changes, ensure_found},
    validation::{non_blank, present, require_fields},
};

const BRANDS_EMPTY: EmptyListPolicy = EmptyListPolicy::NotFound("No brands found");

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(get_all_brands))
        .routes(routes!(get_brands_by_id));

    let guarded = OpenApiRouter::new()
        .routes(routes!(create_brand))
        .routes(routes!(update_brand_by_id))
        .routes(routes!(delete_brand_by_id))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    public.merge(guarded)
}

#[derive(Deserialize, ToSchema)]
pub struct BrandReq {
    pub brand_name: Option<String>,
    pub description: Option<String>,
    pub admin_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateBrandRes {
    pub message: String,
    pub brand_id: i32,
}

#[utoipa::path(
    get,
    path = "/getAllBrands",
    tags = ["Brands"],
    responses(
        (status = 200, description = "All brands", body = Vec<BrandEntity>),
        (status = 404, description = "No brands", body = MessageRes)
    )
)]
async fn get_all_brands(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let brands = state.store.list_brands().await?;
    BRANDS_EMPTY.respond(brands)
}

#[utoipa::path(
    get,
    path = "/getBrandsById/{id}",
    tags = ["Brands"],
    params(
        ("id" = i32, Path, description = "Brand ID to fetch")
    ),
    responses(
        (status = 200, description = "Brand found", body = BrandEntity),
        (status = 404, description = "Brand not found", body = MessageRes)
    )
)]
async fn get_brands_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let brand = state
        .store
        .get_brand(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Brand not found".to_string()))?;

    Ok(Json(brand))
}

#[utoipa::path(
    post,
    path = "/createBrand",
    tags = ["Brands"],
    request_body = BrandReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Brand created", body = CreateBrandRes),
        (status = 400, description = "Missing brand name", body = MessageRes)
    )
)]
async fn create_brand(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<BrandReq>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[("brand_name", present(&req.brand_name))])?;

    let brand_id = state
        .store
        .create_brand(NewBrand {
            brand_name: req.brand_name.unwrap_or_default(),
            description: non_blank(req.description),
            admin_id: req.admin_id.or(Some(caller.id)),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBrandRes {
            message: "Brand created successfully".to_string(),
            brand_id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/updateBrandById/{id}",
    tags = ["Brands"],
    params(
        ("id" = i32, Path, description = "Brand ID to update")
    ),
    request_body = BrandReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Brand updated", body = MessageRes),
        (status = 400, description = "Empty payload", body = MessageRes),
        (status = 404, description = "Brand not found", body = MessageRes)
    )
)]
async fn update_brand_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<BrandReq>,
) -> Result<impl IntoResponse, AppError> {
    let mut changes = BrandChanges {
        brand_name: req.brand_name,
        description: req.description,
        admin_id: req.admin_id,
    };
    ensure_changes(changes.is_empty())?;
    changes.admin_id = changes.admin_id.or(Some(caller.id));

    let updated = state.store.update_brand(id, changes).await?;
    ensure_found(updated, "Brand not found")?;

    Ok(MessageRes::new("Brand updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/deleteBrandById/{id}",
    tags = ["Brands"],
    params(
        ("id" = i32, Path, description = "Brand ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Brand deleted", body = MessageRes),
        (status = 404, description = "Brand not found", body = MessageRes)
    )
)]
async fn delete_brand_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_brand(id).await?;
    ensure_found(deleted, "Brand not found")?;

    Ok(MessageRes::new("Brand deleted successfully"))
}
