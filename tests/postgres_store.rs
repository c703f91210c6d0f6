//! Foreign-key actions and unique constraints as enforced by the real schema.
//! Needs a disposable database: `DATABASE_URL=... cargo test -- --ignored`.

use std::env;

use chrono::Utc;
use diesel_migrations::{EmbeddedMigrations, embed_migrations};
use storefront_api::{
    config::DatabaseConfig,
    db,
    models::{
        NewCategory, NewOrder, NewOrderItem, NewPayment, NewProduct, NewProductVariant, NewUser,
    },
    store::{
        CategoryRepository, OrderItemRepository, OrderRepository, PaymentRepository, PgStore,
        ProductRepository, ProductVariantRepository, StoreError, UserRepository,
    },
};
use tokio::sync::OnceCell;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static MIGRATED: OnceCell<()> = OnceCell::const_new();

async fn pg_store() -> PgStore {
    let url = env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");

    MIGRATED
        .get_or_init(|| async {
            db::run_migrations_blocking(MIGRATIONS, &url).await.unwrap();
        })
        .await;

    let pool = db::create_pool(&DatabaseConfig {
        url,
        max_connections: 2,
        connection_timeout_secs: 10,
    })
    .await
    .unwrap();
    PgStore::new(pool)
}

fn unique_email(prefix: &str) -> String {
    format!(
        "{}-{}@example.com",
        prefix,
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

fn new_user(email: String) -> NewUser {
    NewUser {
        first_name: "Ayesha".to_string(),
        last_name: "Khan".to_string(),
        email,
        password_hash: "hash".to_string(),
        phone_number1: None,
        phone_number2: None,
        street_address: "12 Mall Road".to_string(),
        city: "Lahore".to_string(),
        province: "Punjab".to_string(),
        country: "Pakistan".to_string(),
        gmaplink: None,
    }
}

fn new_product() -> NewProduct {
    NewProduct {
        product_name: "Kurta".to_string(),
        description: None,
        price: 45.0,
        stock_quantity: 10,
        status: true,
        category_id: None,
        brand_id: None,
        admin_id: None,
        image_url: None,
    }
}

fn new_variant(product_id: i32) -> NewProductVariant {
    NewProductVariant {
        product_id,
        size: "L".to_string(),
        color: "Blue".to_string(),
        price: 50.0,
        stock_quantity: 3,
        admin_id: None,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_is_unique_violation() {
    let store = pg_store().await;
    let email = unique_email("dup");
    store.create_user(new_user(email.clone())).await.unwrap();

    let err = store.create_user(new_user(email)).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::UniqueViolation { ref constraint } if constraint == "users_email_key"
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_category_delete_nulls_children() {
    let store = pg_store().await;
    let parent_id = store
        .create_category(NewCategory {
            category_name: "Clothing".to_string(),
            description: None,
            parent_category_id: None,
            admin_id: None,
        })
        .await
        .unwrap();
    let child_id = store
        .create_category(NewCategory {
            category_name: "Kurtas".to_string(),
            description: None,
            parent_category_id: Some(parent_id),
            admin_id: None,
        })
        .await
        .unwrap();

    assert_eq!(store.delete_category(parent_id).await.unwrap(), 1);

    let child = store.get_category(child_id).await.unwrap().unwrap();
    assert_eq!(child.parent_category_id, None);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_product_delete_removes_variants() {
    let store = pg_store().await;
    let product_id = store.create_product(new_product()).await.unwrap();
    let variant_id = store.create_variant(new_variant(product_id)).await.unwrap();

    assert_eq!(store.delete_product(product_id).await.unwrap(), 1);

    assert!(store.get_variant(variant_id).await.unwrap().is_none());
    assert!(store.list_variants_by_product(product_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_order_delete_removes_items_and_payments() {
    let store = pg_store().await;
    let user_id = store
        .create_user(new_user(unique_email("order")))
        .await
        .unwrap();
    let product_id = store.create_product(new_product()).await.unwrap();
    let variant_id = store.create_variant(new_variant(product_id)).await.unwrap();
    let order_id = store
        .create_order(NewOrder {
            user_id,
            total_amount: 100.0,
            order_status: "Pending".to_string(),
            admin_id: None,
        })
        .await
        .unwrap();
    let item_id = store
        .create_order_item(NewOrderItem {
            order_id,
            product_id,
            variant_id,
            quantity: 2,
            price_at_purchase: 50.0,
        })
        .await
        .unwrap();
    store
        .create_payment(NewPayment {
            order_id,
            payment_method: "Card".to_string(),
            amount: 100.0,
            status: "Pending".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(store.delete_order(order_id).await.unwrap(), 1);

    assert_eq!(store.order_item_owner(item_id).await.unwrap(), None);
    assert!(store.list_payments_by_order(order_id).await.unwrap().is_empty());
}
