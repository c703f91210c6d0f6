use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath},
    middleware::{self, AuthUser},
    models::{NewOrder, OrderEntity},
    routes::{EmptyListPolicy, ensure_found},
    validation::{OrderStatus, non_negative_amount, require_fields},
};

const ORDERS_EMPTY: EmptyListPolicy = EmptyListPolicy::NotFound("No orders found");
const ORDER_DENIED: &str = "Access denied to this order";
const USER_ORDERS_EMPTY: EmptyListPolicy = EmptyListPolicy::NotFound("No orders found for this user");

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(create_order))
        .routes(routes!(get_order_by_id));

    let owner = OpenApiRouter::new()
        .routes(routes!(get_order_by_user_id))
        .routes(routes!(update_order_status))
        .routes(routes!(delete_order))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::users_authorization,
        ));

    let admin = OpenApiRouter::new()
        .routes(routes!(get_orders))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    public.merge(owner).merge(admin)
}

#[derive(Deserialize, ToSchema)]
pub struct CreateOrderReq {
    pub user_id: Option<i32>,
    pub total_amount: Option<f64>,
    pub order_status: Option<String>,
    pub admin_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateOrderRes {
    pub message: String,
    pub order_id: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateOrderStatusReq {
    pub order_status: Option<String>,
}

/// Place an order. Status starts as `Pending` unless a valid one is supplied.
#[utoipa::path(
    post,
    path = "/createOrder",
    tags = ["Orders"],
    request_body = CreateOrderReq,
    responses(
        (status = 201, description = "Order created", body = CreateOrderRes),
        (status = 400, description = "Missing or invalid fields", body = MessageRes)
    )
)]
async fn create_order(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateOrderReq>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("user_id", req.user_id.is_some()),
        ("total_amount", req.total_amount.is_some()),
    ])?;
    let total_amount = req.total_amount.unwrap_or_default();
    non_negative_amount("total_amount", total_amount)?;

    let status = match req.order_status.as_deref() {
        Some(status) => OrderStatus::parse(status)?,
        None => OrderStatus::Pending,
    };

    let order_id = state
        .store
        .create_order(NewOrder {
            user_id: req.user_id.unwrap_or_default(),
            total_amount,
            order_status: status.to_string(),
            admin_id: req.admin_id,
        })
        .await?;

    tracing::info!(order_id, %status, "Order created");
    Ok((
        StatusCode::CREATED,
        Json(CreateOrderRes {
            message: "Order created successfully".to_string(),
            order_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/orders",
    tags = ["Orders"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All orders", body = Vec<OrderEntity>),
        (status = 404, description = "No orders", body = MessageRes)
    )
)]
async fn get_orders(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = state.store.list_orders().await?;
    ORDERS_EMPTY.respond(orders)
}

/// Fetch a specific order.
#[utoipa::path(
    get,
    path = "/getOrderById/{id}",
    tags = ["Orders"],
    params(
        ("id" = i32, Path, description = "Order ID to fetch")
    ),
    responses(
        (status = 200, description = "Order found", body = OrderEntity),
        (status = 404, description = "Order not found", body = MessageRes)
    )
)]
async fn get_order_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .store
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

/// Orders placed by one user, newest first. Users only see their own.
#[utoipa::path(
    get,
    path = "/getOrderByUserId/{id}",
    tags = ["Orders"],
    params(
        ("id" = i32, Path, description = "User whose orders to list")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Orders of the user", body = Vec<OrderEntity>),
        (status = 403, description = "Another user's orders", body = MessageRes),
        (status = 404, description = "No orders for this user", body = MessageRes)
    )
)]
async fn get_order_by_user_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    middleware::require_ownership(Some(id), &caller, "Access denied to these orders")?;

    let orders = state.store.list_orders_by_user(id).await?;
    USER_ORDERS_EMPTY.respond(orders)
}

/// Any status may follow any other; only the value itself is checked.
#[utoipa::path(
    put,
    path = "/updateOrderStatus/{id}",
    tags = ["Orders"],
    params(
        ("id" = i32, Path, description = "Order ID to update")
    ),
    request_body = UpdateOrderStatusReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Status updated", body = MessageRes),
        (status = 400, description = "Invalid status", body = MessageRes),
        (status = 403, description = "Order is not yours", body = MessageRes),
        (status = 404, description = "Order not found", body = MessageRes)
    )
)]
async fn update_order_status(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<UpdateOrderStatusReq>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = state.store.order_owner(id).await?;
    middleware::require_ownership(owner_id, &caller, ORDER_DENIED)?;

    let status = OrderStatus::parse(req.order_status.as_deref().unwrap_or_default())?;

    let updated = state
        .store
        .update_order_status(id, status.as_str())
        .await?;
    ensure_found(updated, "Order not found")?;

    tracing::info!(order_id = id, %status, "Order status changed");
    Ok(MessageRes::new("Order status updated successfully"))
}

/// Hard delete; the order's items and payments are removed with it.
#[utoipa::path(
    delete,
    path = "/deleteOrder/{id}",
    tags = ["Orders"],
    params(
        ("id" = i32, Path, description = "Order ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Order deleted", body = MessageRes),
        (status = 403, description = "Order is not yours", body = MessageRes),
        (status = 404, description = "Order not found", body = MessageRes)
    )
)]
async fn delete_order(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = state.store.order_owner(id).await?;
    middleware::require_ownership(owner_id, &caller, ORDER_DENIED)?;

    let deleted = state.store.delete_order(id).await?;
    ensure_found(deleted, "Order not found")?;

    Ok(MessageRes::new("Order deleted successfully"))
}
