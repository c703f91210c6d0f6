use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath},
    models::{CartItemDetails, NewCartItem},
    routes::{EmptyListPolicy, ensure_found},
    validation::{positive_quantity, require_fields},
};

const CART_ITEMS_EMPTY: EmptyListPolicy = EmptyListPolicy::Ok;

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_cart_items))
        .routes(routes!(add_cart_item))
        .routes(routes!(update_cart_item))
        .routes(routes!(delete_cart_item))
        .routes(routes!(clear_cart))
}

#[derive(Deserialize, ToSchema)]
pub struct AddCartItemReq {
    pub cart_id: Option<i32>,
    pub product_id: Option<i32>,
    pub variant_id: Option<i32>,
    pub quantity: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct AddCartItemRes {
    pub message: String,
    pub cart_item_id: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateCartItemReq {
    pub quantity: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct ClearCartRes {
    pub message: String,
    pub affected_rows: usize,
}

#[utoipa::path(
    get,
    path = "/getCartItems/{cart_id}",
    tags = ["Cart items"],
    params(
        ("cart_id" = i32, Path, description = "Cart whose items to list")
    ),
    responses(
        (status = 200, description = "Items with product name and variant details", body = Vec<CartItemDetails>)
    )
)]
async fn get_cart_items(
    AppPath(cart_id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.store.list_cart_items(cart_id).await?;
    CART_ITEMS_EMPTY.respond(items)
}

#[utoipa::path(
    post,
    path = "/addCartItem",
    tags = ["Cart items"],
    request_body = AddCartItemReq,
    responses(
        (status = 201, description = "Item added", body = AddCartItemRes),
        (status = 400, description = "Missing or invalid fields", body = MessageRes)
    )
)]
async fn add_cart_item(
    State(state): State<AppState>,
    AppJson(req): AppJson<AddCartItemReq>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("cart_id", req.cart_id.is_some()),
        ("product_id", req.product_id.is_some()),
        ("quantity", req.quantity.is_some()),
    ])?;
    let quantity = req.quantity.unwrap_or_default();
    positive_quantity(quantity)?;

    let cart_item_id = state
        .store
        .add_cart_item(NewCartItem {
            cart_id: req.cart_id.unwrap_or_default(),
            product_id: req.product_id.unwrap_or_default(),
            variant_id: req.variant_id,
            quantity,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddCartItemRes {
            message: "Item added to cart".to_string(),
            cart_item_id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/updateCartItem/{id}",
    tags = ["Cart items"],
    params(
        ("id" = i32, Path, description = "Cart item ID to update")
    ),
    request_body = UpdateCartItemReq,
    responses(
        (status = 200, description = "Quantity updated", body = MessageRes),
        (status = 400, description = "Missing or invalid quantity", body = MessageRes),
        (status = 404, description = "Cart item not found", body = MessageRes)
    )
)]
async fn update_cart_item(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateCartItemReq>,
) -> Result<impl IntoResponse, AppError> {
    let Some(quantity) = req.quantity else {
        return Err(AppError::BadRequest("Valid quantity is required".to_string()));
    };
    positive_quantity(quantity)?;

    let updated = state.store.update_cart_item_quantity(id, quantity).await?;
    ensure_found(updated, "Cart item not found")?;

    Ok(MessageRes::new("Cart item updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/deleteCartItem/{id}",
    tags = ["Cart items"],
    params(
        ("id" = i32, Path, description = "Cart item ID to delete")
    ),
    responses(
        (status = 200, description = "Item deleted", body = MessageRes),
        (status = 404, description = "Cart item not found", body = MessageRes)
    )
)]
async fn delete_cart_item(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_cart_item(id).await?;
    ensure_found(deleted, "Cart item not found")?;

    Ok(MessageRes::new("Cart item deleted successfully"))
}

/// Empties a cart. Clearing an already empty cart still succeeds with zero rows.
#[utoipa::path(
    delete,
    path = "/clearCart/{cart_id}",
    tags = ["Cart items"],
    params(
        ("cart_id" = i32, Path, description = "Cart to empty")
    ),
    responses(
        (status = 200, description = "Cart emptied", body = ClearCartRes)
    )
)]
async fn clear_cart(
    AppPath(cart_id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let affected_rows = state.store.clear_cart(cart_id).await?;

    Ok(Json(ClearCartRes {
        message: "All items cleared from cart".to_string(),
        affected_rows,
    }))
}
