use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    app_error::{AppError, MessageRes},
    app_state::AppState,
    extract::{AppJson, AppPath},
    middleware::{self, AuthUser},
    models::{NewPayment, PaymentEntity},
    routes::{EmptyListPolicy, ensure_found},
    validation::{PaymentStatus, non_negative_amount, present, require_fields},
};

const PAYMENTS_EMPTY: EmptyListPolicy = EmptyListPolicy::Ok;
const ORDER_PAYMENTS_EMPTY: EmptyListPolicy =
    EmptyListPolicy::NotFound("No payments found for the specified order");

const ORDER_DENIED: &str = "Access denied to this order";

pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    let owner = OpenApiRouter::new()
        .routes(routes!(create_payment))
        .routes(routes!(get_payments_by_order))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::users_authorization,
        ));

    let admin = OpenApiRouter::new()
        .routes(routes!(get_all_payments))
        .routes(routes!(update_payment_status))
        .routes(routes!(delete_payment))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admins_authorization,
        ));

    owner.merge(admin)
}

#[derive(Deserialize, ToSchema)]
pub struct CreatePaymentReq {
    pub order_id: Option<i32>,
    pub payment_method: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct CreatePaymentRes {
    pub message: String,
    pub payment_id: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePaymentStatusReq {
    pub status: Option<String>,
}

/// Record a payment against an order the caller owns. Payments are not
/// reconciled against the order total.
#[utoipa::path(
    post,
    path = "/createPayment",
    tags = ["Payments"],
    request_body = CreatePaymentReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Payment recorded", body = CreatePaymentRes),
        (status = 400, description = "Missing or invalid fields", body = MessageRes),
        (status = 403, description = "Order is not yours", body = MessageRes)
    )
)]
async fn create_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(req): AppJson<CreatePaymentReq>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("order_id", req.order_id.is_some()),
        ("payment_method", present(&req.payment_method)),
        ("amount", req.amount.is_some()),
    ])?;
    let order_id = req.order_id.unwrap_or_default();
    let amount = req.amount.unwrap_or_default();
    non_negative_amount("amount", amount)?;

    let owner_id = state.store.order_owner(order_id).await?;
    middleware::require_ownership(owner_id, &caller, ORDER_DENIED)?;

    let payment_id = state
        .store
        .create_payment(NewPayment {
            order_id,
            payment_method: req.payment_method.unwrap_or_default(),
            amount,
            status: PaymentStatus::Pending.to_string(),
        })
        .await?;

    tracing::info!(payment_id, order_id, "Payment recorded");
    Ok((
        StatusCode::CREATED,
        Json(CreatePaymentRes {
            message: "Payment created successfully".to_string(),
            payment_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/admin/getAllPayments",
    tags = ["Payments"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Every payment", body = Vec<PaymentEntity>)
    )
)]
async fn get_all_payments(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let payments = state.store.list_payments().await?;
    PAYMENTS_EMPTY.respond(payments)
}

#[utoipa::path(
    get,
    path = "/getPaymentsByOrder/{order_id}",
    tags = ["Payments"],
    params(
        ("order_id" = i32, Path, description = "Order whose payments to list")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Payments of the order", body = Vec<PaymentEntity>),
        (status = 403, description = "Order is not yours", body = MessageRes),
        (status = 404, description = "No payments for the order", body = MessageRes)
    )
)]
async fn get_payments_by_order(
    AppPath(order_id): AppPath<i32>,
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = state.store.order_owner(order_id).await?;
    middleware::require_ownership(owner_id, &caller, ORDER_DENIED)?;

    let payments = state.store.list_payments_by_order(order_id).await?;
    ORDER_PAYMENTS_EMPTY.respond(payments)
}

#[utoipa::path(
    put,
    path = "/admin/updatePaymentStatus/{payment_id}",
    tags = ["Payments"],
    params(
        ("payment_id" = i32, Path, description = "Payment ID to update")
    ),
    request_body = UpdatePaymentStatusReq,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Status updated", body = MessageRes),
        (status = 400, description = "Missing or invalid status", body = MessageRes),
        (status = 404, description = "Payment not found", body = MessageRes)
    )
)]
async fn update_payment_status(
    AppPath(payment_id): AppPath<i32>,
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdatePaymentStatusReq>,
) -> Result<impl IntoResponse, AppError> {
    let Some(status) = req.status else {
        return Err(AppError::BadRequest(
            "Payment status is required".to_string(),
        ));
    };
    let status = PaymentStatus::parse(&status)?;

    let updated = state
        .store
        .update_payment_status(payment_id, status.as_str())
        .await?;
    ensure_found(updated, "Payment not found")?;

    tracing::info!(payment_id, %status, "Payment status changed");
    Ok(MessageRes::new("Payment status updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/admin/deletePayment/{payment_id}",
    tags = ["Payments"],
    params(
        ("payment_id" = i32, Path, description = "Payment ID to delete")
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Payment deleted", body = MessageRes),
        (status = 404, description = "Payment not found", body = MessageRes)
    )
)]
async fn delete_payment(
    AppPath(payment_id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_payment(payment_id).await?;
    ensure_found(deleted, "Payment not found")?;

    Ok(MessageRes::new("Payment deleted successfully"))
}
