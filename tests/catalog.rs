mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_catalog_mutations_require_admin() {
    let app = TestApp::new();
    let user_id = app.create_user("ayesha@example.com").await;
    let body = json!({ "category_name": "Clothing" });

    let (status, _) = app.post("/create_category", None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/create_category", Some(&app.user_token(user_id)), body.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/createBrand", Some(&app.user_token(user_id)), json!({ "brand_name": "Khaadi" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_category_provenance_and_empty_listing() {
    let app = TestApp::new();
    let admin_id = app.create_admin("admin@example.com").await;
    let admin = app.admin_token(admin_id);

    let (status, body) = app.get("/get_all_product_categories", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No product categories found");

    let (status, body) = app
        .post("/create_category", Some(&admin), json!({ "category_name": "Clothing" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = body["category_id"].as_i64().unwrap();

    let (_, body) = app
        .get(&format!("/get_single_category/{}", category_id), None)
        .await;
    assert_eq!(body["admin_id"], admin_id);

    let (status, body) = app
        .put(
            &format!("/update_category/{}", category_id),
            Some(&admin),
            json!({ "parent_category_id": category_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A category cannot be its own parent");

    let (status, body) = app
        .put(&format!("/update_category/{}", category_id), Some(&admin), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No fields provided for update");
}

#[tokio::test]
async fn test_deleting_category_orphans_products() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);

    let (_, body) = app
        .post("/create_category", Some(&admin), json!({ "category_name": "Clothing" }))
        .await;
    let category_id = body["category_id"].as_i64().unwrap();

    let (_, body) = app
        .post(
            "/createProduct",
            Some(&admin),
            json!({
                "product_name": "Kurta",
                "price": 45.0,
                "stock_quantity": 10,
                "category_id": category_id
            }),
        )
        .await;
    let product_id = body["product_id"].as_i64().unwrap();

    let (status, body) = app
        .delete(&format!("/delete_category/{}", category_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category permanently deleted");

    let (status, body) = app.get(&format!("/getProductById/{}", product_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["category_id"].is_null());
}

#[tokio::test]
async fn test_product_filters_and_defaults() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);

    let (_, body) = app
        .post("/createBrand", Some(&admin), json!({ "brand_name": "Khaadi" }))
        .await;
    let brand_id = body["brand_id"].as_i64().unwrap();

    app.post(
        "/createProduct",
        Some(&admin),
        json!({ "product_name": "Kurta", "price": 45.0, "stock_quantity": 10, "brand_id": brand_id }),
    )
    .await;
    app.post(
        "/createProduct",
        Some(&admin),
        json!({ "product_name": "Shawl", "price": 30.0, "stock_quantity": 0, "status": false }),
    )
    .await;

    let (status, body) = app.get("/getAllProducts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["status"], true);

    let (_, body) = app
        .get(&format!("/getAllProducts?brand_id={}", brand_id), None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["product_name"], "Kurta");

    let (_, body) = app.get("/getAllProducts?status=false", None).await;
    assert_eq!(body[0]["product_name"], "Shawl");

    let (status, _) = app.get("/getAllProducts?brand_id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_validation() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);

    let (status, body) = app
        .post("/createProduct", Some(&admin), json!({ "product_name": "Kurta" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: price, stock_quantity");

    let (status, _) = app
        .post(
            "/createProduct",
            Some(&admin),
            json!({ "product_name": "Kurta", "price": -5.0, "stock_quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_product_removes_variants() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);
    let (product_id, variant_id) = app.create_product_with_variant(&admin).await;

    let (status, body) = app
        .get(&format!("/getProductVariants/{}", product_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["variant_id"], variant_id);

    let (status, _) = app
        .delete(&format!("/deleteProductById/{}", product_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(&format!("/getProductVariant/{}", variant_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product variant not found");

    let (status, body) = app
        .get(&format!("/getProductVariants/{}", product_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_deleting_admin_keeps_their_catalog() {
    let app = TestApp::new();
    let admin_id = app.create_admin("admin@example.com").await;
    let admin = app.admin_token(admin_id);

    let (_, body) = app
        .post("/createBrand", Some(&admin), json!({ "brand_name": "Khaadi" }))
        .await;
    let brand_id = body["brand_id"].as_i64().unwrap();

    let (status, _) = app
        .delete(&format!("/deleteAdmin/{}", admin_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/getBrandsById/{}", brand_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["admin_id"].is_null());
}
