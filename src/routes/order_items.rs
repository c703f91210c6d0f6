use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath},
    middleware::{self, AuthUser},
    models::{NewOrderItem, OrderItemChanges, OrderItemEntity},
    routes::{EmptyListPolicy, ensure_changes, ensure_found},
    validation::{non_negative_amount, positive_quantity, require_fields},
};

const ORDER_ITEMS_BY_ORDER_EMPTY: EmptyListPolicy =
    EmptyListPolicy::NotFound("No order items found for this order or access denied");
const ORDER_ITEMS_EMPTY: EmptyListPolicy = EmptyListPolicy::Ok;

const ORDER_DENIED: &str = "Access denied to this order";
const ITEM_DENIED: &str = "Access denied to this order item";

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let owner = OpenApiRouter::new()
        .routes(routes!(get_order_item_by_order_id))
        .routes(routes!(create_order_item))
        .routes(routes!(update_order_item))
        .routes(routes!(delete_order_item))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::users_authorization,
        ));

    let admin = OpenApiRouter::new()
        .routes(routes!(get_all_order_items))
        .routes(routes!(update_order_item_by_admin))
        .routes(routes!(delete_order_item_by_admin))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    owner.merge(admin)
}

#[derive(Deserialize, ToSchema)]
pub struct CreateOrderItemReq {
    pub order_id: Option<i32>,
    pub product_id: Option<i32>,
    pub variant_id: Option<i32>,
    pub quantity: Option<i32>,
    pub price_at_purchase: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateOrderItemRes {
    pub message: String,
    pub order_item_id: i32,
}

/// Only the quantity of a placed item can change.
#[derive(Deserialize, ToSchema)]
pub struct UpdateOrderItemReq {
    pub quantity: Option<i32>,
    /// Rejected when present; the purchase price is fixed at creation.
    pub price_at_purchase: Option<f64>,
}

impl UpdateOrderItemReq {
    fn into_changes(self) -> Result<OrderItemChanges, AppError> {
        if self.price_at_purchase.is_some() {
            return Err(AppError::BadRequest(
                "price_at_purchase cannot be changed after purchase".to_string(),
            ));
        }

        let changes = OrderItemChanges {
            quantity: self.quantity,
        };
        ensure_changes(changes.is_empty())?;
        if let Some(quantity) = changes.quantity {
            positive_quantity(quantity)?;
        }
        Ok(changes)
    }
}

/// Items of one order, visible to the order's owner (admins see any order).
#[utoipa::path(
    get,
    path = "/getOrderItemByOrderId/{id}",
    tags = ["Order items"],
    params(
        ("id" = i32, Path, description = "Order whose items to list")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Items of the order", body = Vec<OrderItemEntity>),
        (status = 404, description = "No items, or the order is not yours", body = MessageRes)
    )
)]
async fn get_order_item_by_order_id(
    AppPath(order_id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = if caller.is_admin() {
        state.store.order_owner(order_id).await?
    } else {
        Some(caller.id)
    };

    let items = match owner_id {
        Some(owner_id) => {
            state
                .store
                .list_order_items_for_owner(order_id, owner_id)
                .await?
        }
        None => Vec::new(),
    };
    ORDER_ITEMS_BY_ORDER_EMPTY.respond(items)
}

/// Add an item to an order the caller owns. Ownership is checked before the rest of the payload.
#[utoipa::path(
    post,
    path = "/createOrderItem",
    tags = ["Order items"],
    request_body = CreateOrderItemReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Item created", body = CreateOrderItemRes),
        (status = 400, description = "Missing or invalid fields", body = MessageRes),
        (status = 403, description = "Order is not yours", body = MessageRes)
    )
)]
async fn create_order_item(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<CreateOrderItemReq>,
) -> Result<impl IntoResponse, AppError> {
    let Some(order_id) = req.order_id else {
        return Err(AppError::BadRequest(
            "Missing required fields: order_id".to_string(),
        ));
    };
    let owner_id = state.store.order_owner(order_id).await?;
    middleware::require_ownership(owner_id, &caller, ORDER_DENIED)?;

    require_fields(&[
        ("product_id", req.product_id.is_some()),
        ("variant_id", req.variant_id.is_some()),
        ("quantity", req.quantity.is_some()),
        ("price_at_purchase", req.price_at_purchase.is_some()),
    ])?;
    let quantity = req.quantity.unwrap_or_default();
    let price_at_purchase = req.price_at_purchase.unwrap_or_default();
    positive_quantity(quantity)?;
    non_negative_amount("price_at_purchase", price_at_purchase)?;

    let order_item_id = state
        .store
        .create_order_item(NewOrderItem {
            order_id,
            product_id: req.product_id.unwrap_or_default(),
            variant_id: req.variant_id.unwrap_or_default(),
            quantity,
            price_at_purchase,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderItemRes {
            message: "Order item created successfully".to_string(),
            order_item_id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/updateOrderItem/{id}",
    tags = ["Order items"],
    params(
        ("id" = i32, Path, description = "Order item ID to update")
    ),
    request_body = UpdateOrderItemReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Item updated", body = MessageRes),
        (status = 400, description = "Empty or invalid payload", body = MessageRes),
        (status = 403, description = "Item is not yours", body = MessageRes),
        (status = 404, description = "Item not found", body = MessageRes)
    )
)]
async fn update_order_item(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<UpdateOrderItemReq>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = state.store.order_item_owner(id).await?;
    middleware::require_ownership(owner_id, &caller, ITEM_DENIED)?;
    let changes = req.into_changes()?;

    let updated = state.store.update_order_item(id, changes).await?;
    ensure_found(updated, "Order item not found")?;

    Ok(MessageRes::new("Order item updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/deleteOrderItem/{id}",
    tags = ["Order items"],
    params(
        ("id" = i32, Path, description = "Order item ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Item deleted", body = MessageRes),
        (status = 403, description = "Item is not yours", body = MessageRes),
        (status = 404, description = "Item not found", body = MessageRes)
    )
)]
async fn delete_order_item(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = state.store.order_item_owner(id).await?;
    middleware::require_ownership(owner_id, &caller, ITEM_DENIED)?;

    let deleted = state.store.delete_order_item(id).await?;
    ensure_found(deleted, "Order item not found")?;

    Ok(MessageRes::new("Order item deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/getAllOrderItems",
    tags = ["Order items"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Every order item", body = Vec<OrderItemEntity>)
    )
)]
async fn get_all_order_items(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.store.list_order_items().await?;
    ORDER_ITEMS_EMPTY.respond(items)
}

#[utoipa::path(
    put,
    path = "/updateOrderItemByAdmin/{id}",
    tags = ["Order items"],
    params(
        ("id" = i32, Path, description = "Order item ID to update")
    ),
    request_body = UpdateOrderItemReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Item updated", body = MessageRes),
        (status = 400, description = "Empty or invalid payload", body = MessageRes),
        (status = 404, description = "Item not found", body = MessageRes)
    )
)]
async fn update_order_item_by_admin(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateOrderItemReq>,
) -> Result<impl IntoResponse, AppError> {
    let changes = req.into_changes()?;

    let updated = state.store.update_order_item(id, changes).await?;
    ensure_found(updated, "Order item not found")?;

    Ok(MessageRes::new("Order item updated successfully by admin"))
}

#[utoipa::path(
    delete,
    path = "/deleteOrderItemByAdmin/{id}",
    tags = ["Order items"],
    params(
        ("id" = i32, Path, description = "Order item ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Item deleted", body = MessageRes),
        (status = 404, description = "Item not found", body = MessageRes)
    )
)]
async fn delete_order_item_by_admin(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_order_item(id).await?;
    ensure_found(deleted, "Order item not found")?;

    Ok(MessageRes::new("Order item deleted successfully by admin"))
}
