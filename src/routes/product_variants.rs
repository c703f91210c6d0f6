use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath},
    middleware::{self, AuthUser},
    models::{NewProductVariant, ProductVariantChanges, ProductVariantEntity},
    routes::{EmptyListPolicy, ensure_changes, ensure_found},
    validation::{non_negative_amount, non_negative_count, present, require_fields},
};

const VARIANTS_EMPTY: EmptyListPolicy = EmptyListPolicy::Ok;

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(get_product_variants))
        .routes(routes!(get_product_variant));

    let guarded = OpenApiRouter::new()
        .routes(routes!(create_product_variant))
        .routes(routes!(update_product_variant))
        .routes(routes!(delete_product_variant))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    public.merge(guarded)
}

#[derive(Deserialize, ToSchema)]
pub struct CreateVariantReq {
    pub product_id: Option<i32>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub admin_id: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateVariantReq {
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub admin_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateVariantRes {
    pub message: String,
    pub variant_id: i32,
}

/// All variants of one product.
#[utoipa::path(
    get,
    path = "/getProductVariants/{product_id}",
    tags = ["Product variants"],
    params(
        ("product_id" = i32, Path, description = "Product whose variants to list")
    ),
    responses(
        (status = 200, description = "Variants of the product", body = Vec<ProductVariantEntity>)
    )
)]
async fn get_product_variants(
    AppPath(product_id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let variants = state.store.list_variants_by_product(product_id).await?;
    VARIANTS_EMPTY.respond(variants)
}

#[utoipa::path(
    get,
    path = "/getProductVariant/{variant_id}",
    tags = ["Product variants"],
    params(
        ("variant_id" = i32, Path, description = "Variant ID to fetch")
    ),
    responses(
        (status = 200, description = "Variant found", body = ProductVariantEntity),
        (status = 404, description = "Variant not found", body = MessageRes)
    )
)]
async fn get_product_variant(
    AppPath(variant_id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let variant = state
        .store
        .get_variant(variant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product variant not found".to_string()))?;

    Ok(Json(variant))
}

#[utoipa::path(
    post,
    path = "/createProductVariant",
    tags = ["Product variants"],
    request_body = CreateVariantReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Variant created", body = CreateVariantRes),
        (status = 400, description = "Missing or invalid fields", body = MessageRes)
    )
)]
async fn create_product_variant(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<CreateVariantReq>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("product_id", req.product_id.is_some()),
        ("size", present(&req.size)),
        ("color", present(&req.color)),
        ("price", req.price.is_some()),
    ])?;
    let price = req.price.unwrap_or_default();
    let stock_quantity = req.stock_quantity.unwrap_or(0);
    non_negative_amount("price", price)?;
    non_negative_count("stock_quantity", stock_quantity)?;

    let variant_id = state
        .store
        .create_variant(NewProductVariant {
            product_id: req.product_id.unwrap_or_default(),
            size: req.size.unwrap_or_default(),
            color: req.color.unwrap_or_default(),
            price,
            stock_quantity,
            admin_id: req.admin_id.or(Some(caller.id)),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateVariantRes {
            message: "Product variant created successfully".to_string(),
            variant_id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/updateProductVariant/{variant_id}",
    tags = ["Product variants"],
    params(
        ("variant_id" = i32, Path, description = "Variant ID to update")
    ),
    request_body = UpdateVariantReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Variant updated", body = MessageRes),
        (status = 400, description = "Empty or invalid payload", body = MessageRes),
        (status = 404, description = "Variant not found", body = MessageRes)
    )
)]
async fn update_product_variant(
    AppPath(variant_id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<UpdateVariantReq>,
) -> Result<impl IntoResponse, AppError> {
    let mut changes = ProductVariantChanges {
        size: req.size,
        color: req.color,
        price: req.price,
        stock_quantity: req.stock_quantity,
        admin_id: req.admin_id,
    };
    ensure_changes(changes.is_empty())?;
    if let Some(price) = changes.price {
        non_negative_amount("price", price)?;
    }
    if let Some(stock_quantity) = changes.stock_quantity {
        non_negative_count("stock_quantity", stock_quantity)?;
    }
    changes.admin_id = changes.admin_id.or(Some(caller.id));

    let updated = state.store.update_variant(variant_id, changes).await?;
    ensure_found(updated, "Product variant not found")?;

    Ok(MessageRes::new("Product variant updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/deleteProductVariant/{variant_id}",
    tags = ["Product variants"],
    params(
        ("variant_id" = i32, Path, description = "Variant ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Variant deleted", body = MessageRes),
        (status = 404, description = "Variant not found", body = MessageRes)
    )
)]
async fn delete_product_variant(
    AppPath(variant_id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_variant(variant_id).await?;
    ensure_found(deleted, "Product variant not found")?;

    Ok(MessageRes::new("Product variant deleted successfully"))
}
