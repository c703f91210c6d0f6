use axum::{Json, Router};
use serde::Serialize;
use utoipa_axum::router::OpenApiRouter;

use crate::{app_error::AppError, app_state::AppState, swagger};

pub mod admins;
pub mod brands;
pub mod cart_items;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod product_variants;
pub mod products;
pub mod shopping_carts;
pub mod users;

/// Every resource router, nested under `/api/v1`.
pub fn routes_with_openapi(state: AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(
        "/api/v1",
        users::routes_with_openapi(state.clone())
            .merge(admins::routes_with_openapi(state.clone()))
            .merge(categories::routes_with_openapi(state.clone()))
            .merge(brands::routes_with_openapi(state.clone()))
            .merge(products::routes_with_openapi(state.clone()))
            .merge(product_variants::routes_with_openapi(state.clone()))
            .merge(orders::routes_with_openapi(state.clone()))
            .merge(order_items::routes_with_openapi(state.clone()))
            .merge(payments::routes_with_openapi(state.clone()))
            .merge(shopping_carts::routes_with_openapi(state))
            .merge(cart_items::routes_with_openapi()),
    )
}

/// The complete application: API routes, Swagger UI and the shared state.
pub fn router(state: AppState) -> Router {
    let (routes, mut openapi) = routes_with_openapi(state.clone()).split_for_parts();
    openapi.info = utoipa::openapi::InfoBuilder::new()
        .title("Storefront API")
        .version("1.0.0")
        .build();

    routes
        .merge(swagger::create_swagger_ui(openapi))
        .with_state(state)
}

/// What a listing answers when nothing matched.
#[derive(Debug, Clone, Copy)]
pub enum EmptyListPolicy {
    Ok,
    NotFound(&'static str),
}

impl EmptyListPolicy {
    pub fn respond<T: Serialize>(self, items: Vec<T>) -> Result<Json<Vec<T>>, AppError> {
        match self {
            EmptyListPolicy::NotFound(message) if items.is_empty() => {
                Err(AppError::NotFound(message.to_string()))
            }
            _ => Ok(Json(items)),
        }
    }
}

/// Partial updates must carry at least one field.
pub(crate) fn ensure_changes(is_empty: bool) -> Result<(), AppError> {
    if is_empty {
        Err(AppError::BadRequest(
            "No fields provided for update".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Zero affected rows means the id did not exist.
pub(crate) fn ensure_found(affected: usize, message: &str) -> Result<(), AppError> {
    if affected == 0 {
        Err(AppError::NotFound(message.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_policy() {
        assert!(EmptyListPolicy::Ok.respond(Vec::<i32>::new()).is_ok());

        let err = EmptyListPolicy::NotFound("No brands found")
            .respond(Vec::<i32>::new())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "No brands found"));

        let Json(items) = EmptyListPolicy::NotFound("No brands found")
            .respond(vec![1, 2])
            .unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_ensure_helpers() {
        assert!(ensure_changes(false).is_ok());
        assert!(matches!(ensure_changes(true), Err(AppError::BadRequest(_))));
        assert!(ensure_found(1, "gone").is_ok());
        assert!(matches!(ensure_found(0, "gone"), Err(AppError::NotFound(_))));
    }
}
