use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath},
    middleware,
    models::{NewShoppingCart, ShoppingCartChanges, ShoppingCartDetails, ShoppingCartEntity},
    routes::{EmptyListPolicy, ensure_changes, ensure_found},
};

const CARTS_EMPTY: EmptyListPolicy = EmptyListPolicy::NotFound("No shopping carts found");

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let public = OpenApiRouter::new()
        .routes(routes!(get_shopping_cart_by_id))
        .routes(routes!(create_shopping_cart))
        .routes(routes!(update_shopping_cart))
        .routes(routes!(delete_shopping_cart));

    let admin = OpenApiRouter::new()
        .routes(routes!(get_shopping_carts))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    public.merge(admin)
}

/// A cart may belong to a user, an admin, or nobody yet.
#[derive(Deserialize, ToSchema, Default)]
pub struct ShoppingCartReq {
    pub user_id: Option<i32>,
    pub admin_id: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateShoppingCartRes {
    pub message: String,
    pub cart_id: i32,
}

#[utoipa::path(
    get,
    path = "/shopping-carts",
    tags = ["Shopping carts"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Every shopping cart", body = Vec<ShoppingCartEntity>),
        (status = 404, description = "No carts exist", body = MessageRes)
    )
)]
async fn get_shopping_carts(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let carts = state.store.list_carts().await?;
    CARTS_EMPTY.respond(carts)
}

/// Cart with the first names of its owning user and admin.
#[utoipa::path(
    get,
    path = "/getShoppingCartById/{id}",
    tags = ["Shopping carts"],
    params(
        ("id" = i32, Path, description = "Cart ID")
    ),
    responses(
        (status = 200, description = "Cart found", body = ShoppingCartDetails),
        (status = 404, description = "Cart not found", body = MessageRes)
    )
)]
async fn get_shopping_cart_by_id(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let cart = state
        .store
        .get_cart(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shopping cart not found".to_string()))?;

    Ok(Json(cart))
}

#[utoipa::path(
    post,
    path = "/createShoppingCart",
    tags = ["Shopping carts"],
    request_body = ShoppingCartReq,
    responses(
        (status = 201, description = "Cart created", body = CreateShoppingCartRes)
    )
)]
async fn create_shopping_cart(
    State(state): State<AppState>,
    AppJson(req): AppJson<ShoppingCartReq>,
) -> Result<impl IntoResponse, AppError> {
    let cart_id = state
        .store
        .create_cart(NewShoppingCart {
            user_id: req.user_id,
            admin_id: req.admin_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateShoppingCartRes {
            message: "Shopping cart created successfully".to_string(),
            cart_id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/updateShoppingCart/{id}",
    tags = ["Shopping carts"],
    params(
        ("id" = i32, Path, description = "Cart ID to update")
    ),
    request_body = ShoppingCartReq,
    responses(
        (status = 200, description = "Cart updated", body = MessageRes),
        (status = 400, description = "No fields supplied", body = MessageRes),
        (status = 404, description = "Cart not found", body = MessageRes)
    )
)]
async fn update_shopping_cart(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
    AppJson(req): AppJson<ShoppingCartReq>,
) -> Result<impl IntoResponse, AppError> {
    let changes = ShoppingCartChanges {
        user_id: req.user_id,
        admin_id: req.admin_id,
    };
    ensure_changes(changes.is_empty())?;

    let updated = state.store.update_cart(id, changes).await?;
    ensure_found(updated, "Shopping cart not found")?;

    Ok(MessageRes::new("Shopping cart updated successfully"))
}

/// Deleting a cart drops its items with it.
#[utoipa::path(
    delete,
    path = "/deleteShoppingCart/{id}",
    tags = ["Shopping carts"],
    params(
        ("id" = i32, Path, description = "Cart ID to delete")
    ),
    responses(
        (status = 200, description = "Cart deleted", body = MessageRes),
        (status = 404, description = "Cart not found", body = MessageRes)
    )
)]
async fn delete_shopping_cart(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_cart(id).await?;
    ensure_found(deleted, "Shopping cart not found")?;

    Ok(MessageRes::new("Shopping cart deleted successfully"))
}
