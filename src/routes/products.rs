use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath, AppQuery},
    middleware::{self, AuthUser},
    models::{NewProduct, ProductChanges, ProductEntity, ProductFilter},
    routes::{EmptyListPolicy, ensure_changes, ensure_found},
    validation::{non_blank, non_negative_amount, non_negative_count, present, require_fields},
};

const PRODUCTS_EMPTY: EmptyListPolicy = EmptyListPolicy::Ok;

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(get_all_products))
        .routes(routes!(get_product_by_id));

    let guarded = OpenApiRouter::new()
        .routes(routes!(create_product))
        .routes(routes!(update_product_by_id))
        .routes(routes!(delete_product_by_id))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    public.merge(guarded)
}

#[derive(Deserialize, ToSchema)]
pub struct ProductReq {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub status: Option<bool>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub admin_id: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateProductRes {
    pub message: String,
    pub product_id: i32,
}

fn validate_stock_and_price(price: Option<f64>, stock_quantity: Option<i32>) -> Result<(), AppError> {
    if let Some(price) = price {
        non_negative_amount("price", price)?;
    }
    if let Some(stock_quantity) = stock_quantity {
        non_negative_count("stock_quantity", stock_quantity)?;
    }
    Ok(())
}

/// List products, optionally narrowed by category, brand and status.
#[utoipa::path(
    get,
    path = "/getAllProducts",
    tags = ["Products"],
    params(ProductFilter),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductEntity>)
    )
)]
async fn get_all_products(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<ProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.store.list_products(filter).await?;
    PRODUCTS_EMPTY.respond(products)
}

#[utoipa::path(
    get,
    path = "/getProductById/{id}",
    tags = ["Products"],
    params(
        ("id" = i32, Path, description = "Product ID to fetch")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductEntity),
        (status = 404, description = "Product not found", body = MessageRes)
    )
)]
async fn get_product_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .store
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/createProduct",
    tags = ["Products"],
    request_body = ProductReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Product created", body = CreateProductRes),
        (status = 400, description = "Missing or invalid fields", body = MessageRes)
    )
)]
async fn create_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<ProductReq>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("product_name", present(&req.product_name)),
        ("price", req.price.is_some()),
        ("stock_quantity", req.stock_quantity.is_some()),
    ])?;
    validate_stock_and_price(req.price, req.stock_quantity)?;

    let product_id = state
        .store
        .create_product(NewProduct {
            product_name: req.product_name.unwrap_or_default(),
            description: non_blank(req.description),
            price: req.price.unwrap_or_default(),
            stock_quantity: req.stock_quantity.unwrap_or_default(),
            status: req.status.unwrap_or(true),
            category_id: req.category_id,
            brand_id: req.brand_id,
            admin_id: req.admin_id.or(Some(caller.id)),
            image_url: non_blank(req.image_url),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductRes {
            message: "Product created successfully".to_string(),
            product_id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/updateProductById/{id}",
    tags = ["Products"],
    params(
        ("id" = i32, Path, description = "Product ID to update")
    ),
    request_body = ProductReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Product updated", body = MessageRes),
        (status = 400, description = "Empty or invalid payload", body = MessageRes),
        (status = 404, description = "Product not found", body = MessageRes)
    )
)]
async fn update_product_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<ProductReq>,
) -> Result<impl IntoResponse, AppError> {
    let mut changes = ProductChanges {
        product_name: req.product_name,
        description: req.description,
        price: req.price,
        stock_quantity: req.stock_quantity,
        status: req.status,
        category_id: req.category_id,
        brand_id: req.brand_id,
        admin_id: req.admin_id,
        image_url: req.image_url,
    };
    ensure_changes(changes.is_empty())?;
    validate_stock_and_price(changes.price, changes.stock_quantity)?;
    changes.admin_id = changes.admin_id.or(Some(caller.id));

    let updated = state.store.update_product(id, changes).await?;
    ensure_found(updated, "Product not found")?;

    Ok(MessageRes::new("Product updated successfully"))
}

/// Hard delete; variants, order items and cart items referencing the product go with it.
#[utoipa::path(
    delete,
    path = "/deleteProductById/{id}",
    tags = ["Products"],
    params(
        ("id" = i32, Path, description = "Product ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Product deleted", body = MessageRes),
        (status = 404, description = "Product not found", body = MessageRes)
    )
)]
async fn delete_product_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_product(id).await?;
    ensure_found(deleted, "Product not found")?;

    tracing::info!(product_id = id, "Product deleted");
    Ok(MessageRes::new("Product deleted successfully"))
}
