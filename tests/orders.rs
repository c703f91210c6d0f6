mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_order_lifecycle() {
    let app = TestApp::new();
    let user_id = app.create_user("ayesha@example.com").await;
    let order_id = app.create_order(user_id).await;
    let owner = app.user_token(user_id);

    let (status, body) = app.get(&format!("/getOrderById/{}", order_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_status"], "Pending");

    let (status, body) = app
        .put(
            &format!("/updateOrderStatus/{}", order_id),
            Some(&owner),
            json!({ "order_status": "Teleported" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Pending, Shipped, Delivered, Cancelled"));

    let (status, _) = app
        .put(
            &format!("/updateOrderStatus/{}", order_id),
            Some(&owner),
            json!({ "order_status": "Shipped" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .delete(&format!("/deleteOrder/{}", order_id), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order deleted successfully");

    let (status, _) = app.get(&format!("/getOrderById/{}", order_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_writes_require_owner() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);
    let ayesha = app.create_user("ayesha@example.com").await;
    let omar = app.create_user("omar@example.com").await;
    let order_id = app.create_order(ayesha).await;
    let owner = app.user_token(ayesha);
    let intruder = app.user_token(omar);

    let (status, _) = app
        .post(
            "/createPayment",
            Some(&owner),
            json!({ "order_id": order_id, "payment_method": "Card", "amount": 120.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let status_uri = format!("/updateOrderStatus/{}", order_id);
    let delete_uri = format!("/deleteOrder/{}", order_id);
    let shipped = json!({ "order_status": "Shipped" });

    let (status, body) = app.put(&status_uri, None, shipped.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authorization token missing or invalid");
    let (status, _) = app.delete(&delete_uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.put(&status_uri, Some(&intruder), shipped.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied to this order");
    let (status, _) = app.delete(&delete_uri, Some(&intruder)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get("/admin/getAllPayments", Some(&admin)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (_, body) = app.get(&format!("/getOrderById/{}", order_id), None).await;
    assert_eq!(body["order_status"], "Pending");

    let (status, _) = app.put(&status_uri, Some(&admin), shipped).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&delete_uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_order_for_missing_user_is_storage_error() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/createOrder", None, json!({ "user_id": 42, "total_amount": 10.0 }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database error");
}

#[tokio::test]
async fn test_orders_by_user_guard() {
    let app = TestApp::new();
    let ayesha = app.create_user("ayesha@example.com").await;
    let omar = app.create_user("omar@example.com").await;
    app.create_order(ayesha).await;

    let (status, _) = app
        .get(&format!("/getOrderByUserId/{}", ayesha), Some(&app.user_token(omar)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .get(&format!("/getOrderByUserId/{}", ayesha), Some(&app.user_token(ayesha)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .get(&format!("/getOrderByUserId/{}", omar), Some(&app.user_token(omar)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No orders found for this user");
}

#[tokio::test]
async fn test_order_listing_is_admin_only() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);

    let (status, body) = app.get("/orders", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No orders found");

    let user_id = app.create_user("ayesha@example.com").await;
    let (status, _) = app.get("/orders", Some(&app.user_token(user_id))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_order_item_ownership() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);
    let (product_id, variant_id) = app.create_product_with_variant(&admin).await;
    let ayesha = app.create_user("ayesha@example.com").await;
    let omar = app.create_user("omar@example.com").await;
    let order_id = app.create_order(ayesha).await;
    let owner = app.user_token(ayesha);
    let intruder = app.user_token(omar);

    let item = json!({
        "order_id": order_id,
        "product_id": product_id,
        "variant_id": variant_id,
        "quantity": 2,
        "price_at_purchase": 50.0
    });

    let (status, body) = app.post("/createOrderItem", Some(&intruder), item.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied to this order");

    let (status, body) = app
        .post(
            "/createOrderItem",
            Some(&intruder),
            json!({ "order_id": order_id, "quantity": -5 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied to this order");

    let (status, body) = app.post("/createOrderItem", Some(&owner), item).await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = body["order_item_id"].as_i64().unwrap();

    let (status, body) = app
        .get(&format!("/getOrderItemByOrderId/{}", order_id), Some(&intruder))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No order items found for this order or access denied");

    let (status, body) = app
        .get(&format!("/getOrderItemByOrderId/{}", order_id), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["quantity"], 2);

    let (status, body) = app
        .get(&format!("/getOrderItemByOrderId/{}", order_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = app
        .put(&format!("/updateOrderItem/{}", item_id), Some(&intruder), json!({ "quantity": 5 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(
            &format!("/updateOrderItem/{}", item_id),
            Some(&owner),
            json!({ "price_at_purchase": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(&format!("/updateOrderItem/{}", item_id), Some(&owner), json!({ "quantity": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Valid quantity is required");

    let (status, _) = app
        .put(&format!("/updateOrderItem/{}", item_id), Some(&owner), json!({ "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&format!("/deleteOrderItem/{}", item_id), Some(&intruder)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .delete(&format!("/deleteOrderItemByAdmin/{}", item_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order item deleted successfully by admin");

    let (status, body) = app.get("/getAllOrderItems", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_missing_order_item_for_user_and_admin() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);
    let user_id = app.create_user("ayesha@example.com").await;

    let (status, _) = app
        .delete("/deleteOrderItem/99", Some(&app.user_token(user_id)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.delete("/deleteOrderItem/99", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order item not found");
}

#[tokio::test]
async fn test_payments_flow() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);
    let ayesha = app.create_user("ayesha@example.com").await;
    let omar = app.create_user("omar@example.com").await;
    let order_id = app.create_order(ayesha).await;
    let owner = app.user_token(ayesha);

    let (status, body) = app
        .get(&format!("/getPaymentsByOrder/{}", order_id), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No payments found for the specified order");

    let payment = json!({ "order_id": order_id, "payment_method": "Card", "amount": 120.0 });
    let (status, _) = app
        .post("/createPayment", Some(&app.user_token(omar)), payment.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(
            "/createPayment",
            Some(&owner),
            json!({ "order_id": order_id, "payment_method": "Card", "amount": -1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app.post("/createPayment", Some(&owner), payment).await;
    assert_eq!(status, StatusCode::CREATED);
    let payment_id = body["payment_id"].as_i64().unwrap();

    let (status, body) = app
        .get(&format!("/getPaymentsByOrder/{}", order_id), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "Pending");

    let uri = format!("/admin/updatePaymentStatus/{}", payment_id);
    let (status, body) = app.put(&uri, Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Payment status is required");

    let (status, _) = app.put(&uri, Some(&admin), json!({ "status": "Refunded" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.put(&uri, Some(&owner), json!({ "status": "Completed" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.put(&uri, Some(&admin), json!({ "status": "Completed" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/admin/getAllPayments", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "Completed");

    let (status, _) = app
        .delete(&format!("/admin/deletePayment/{}", payment_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .delete(&format!("/admin/deletePayment/{}", payment_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Payment not found");
}

#[tokio::test]
async fn test_deleting_order_removes_items_and_payments() {
    let app = TestApp::new();
    let admin = app.admin_token(app.create_admin("admin@example.com").await);
    let (product_id, variant_id) = app.create_product_with_variant(&admin).await;
    let user_id = app.create_user("ayesha@example.com").await;
    let order_id = app.create_order(user_id).await;
    let owner = app.user_token(user_id);

    app.post(
        "/createOrderItem",
        Some(&owner),
        json!({
            "order_id": order_id,
            "product_id": product_id,
            "variant_id": variant_id,
            "quantity": 1,
            "price_at_purchase": 50.0
        }),
    )
    .await;
    app.post(
        "/createPayment",
        Some(&owner),
        json!({ "order_id": order_id, "payment_method": "Cash", "amount": 50.0 }),
    )
    .await;

    let (status, _) = app
        .delete(&format!("/deleteOrder/{}", order_id), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, items) = app.get("/getAllOrderItems", Some(&admin)).await;
    assert_eq!(items, json!([]));
    let (_, payments) = app.get("/admin/getAllPayments", Some(&admin)).await;
    assert_eq!(payments, json!([]));
}
