#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use storefront_api::{
    app_state::AppState,
    auth::{JwtManager, Role},
    routes,
    store::{MemoryStore, Store},
};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let shared: Arc<dyn Store> = Arc::new(store.clone());
        let state = AppState::new(shared, JwtManager::new("test-secret".to_string(), 3600, 3600));
        let router = routes::router(state.clone());

        TestApp {
            router,
            state,
            store,
        }
    }

    pub fn token(&self, id: i32, role: Role) -> String {
        self.state.jwt.issue_token(id, role).unwrap()
    }

    pub fn user_token(&self, user_id: i32) -> String {
        self.token(user_id, Role::User)
    }

    pub fn admin_token(&self, admin_id: i32) -> String {
        self.token(admin_id, Role::Admin)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{}", uri));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Registers a user over the API and returns its id.
    pub async fn create_user(&self, email: &str) -> i32 {
        let (status, body) = self
            .post("/create_user", None, user_payload(email))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["user_id"].as_i64().unwrap() as i32
    }

    /// Creates the first admin; later admins go through [`Self::create_admin_as`].
    pub async fn create_admin(&self, email: &str) -> i32 {
        self.create_admin_as(email, None).await
    }

    pub async fn create_admin_as(&self, email: &str, token: Option<&str>) -> i32 {
        let (status, body) = self
            .post(
                "/createAdmin",
                token,
                json!({
                    "first_name": "Bilal",
                    "last_name": "Ahmed",
                    "email": email,
                    "password": "admin-pass"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["admin_id"].as_i64().unwrap() as i32
    }

    pub async fn create_order(&self, user_id: i32) -> i32 {
        let (status, body) = self
            .post(
                "/createOrder",
                None,
                json!({ "user_id": user_id, "total_amount": 120.0 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["order_id"].as_i64().unwrap() as i32
    }

    /// Creates a product with one variant; returns `(product_id, variant_id)`.
    pub async fn create_product_with_variant(&self, admin_token: &str) -> (i32, i32) {
        let (status, body) = self
            .post(
                "/createProduct",
                Some(admin_token),
                json!({ "product_name": "Kurta", "price": 45.0, "stock_quantity": 10 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let product_id = body["product_id"].as_i64().unwrap() as i32;

        let (status, body) = self
            .post(
                "/createProductVariant",
                Some(admin_token),
                json!({ "product_id": product_id, "size": "L", "color": "Blue", "price": 50.0 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (product_id, body["variant_id"].as_i64().unwrap() as i32)
    }
}

pub fn user_payload(email: &str) -> Value {
    json!({
        "first_name": "Ayesha",
        "last_name": "Khan",
        "email": email,
        "password": "secret-pass",
        "phone_number1": "0300-1234567",
        "street_address": "12 Mall Road",
        "city": "Lahore",
        "province": "Punjab",
        "country": "Pakistan"
    })
}
