//! Persistence seam. Handlers only ever talk to `Arc<dyn Store>`; the Postgres
//! implementation backs the server and the in-memory one (behind the
//! `test-util` feature) backs the test suite.

use async_trait::async_trait;

use crate::models::{
    AdminChanges, AdminCredentials, AdminEntity, BrandChanges, BrandEntity, CartItemDetails,
    CategoryChanges, CategoryEntity, NewAdmin, NewBrand, NewCartItem, NewCategory, NewOrder,
    NewOrderItem, NewPayment, NewProduct, NewProductVariant, NewShoppingCart, NewUser,
    OrderEntity, OrderItemChanges, OrderItemEntity, PaymentEntity, ProductChanges, ProductEntity,
    ProductFilter, ProductVariantChanges, ProductVariantEntity, ShoppingCartChanges,
    ShoppingCartDetails, ShoppingCartEntity, UserChanges, UserCredentials, UserEntity,
};

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod postgres;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key value violates unique constraint \"{constraint}\"")]
    UniqueViolation { constraint: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Turns a uniqueness failure into a client error with `message`; anything
    /// else stays an opaque server error.
    pub fn or_conflict(self, message: &str) -> crate::app_error::AppError {
        match self {
            StoreError::UniqueViolation { .. } => {
                crate::app_error::AppError::Conflict(message.to_string())
            }
            other => other.into(),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::UniqueViolation {
                    constraint: info.constraint_name().unwrap_or("unknown").to_string(),
                }
            }
            other => StoreError::Other(other.into()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Mutations return the number of rows they touched; zero means the id did not exist.
#[async_trait]
pub trait UserRepository {
    async fn list_users(&self) -> StoreResult<Vec<UserEntity>>;
    async fn get_user(&self, user_id: i32) -> StoreResult<Option<UserEntity>>;
    async fn find_user_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>>;
    async fn create_user(&self, user: NewUser) -> StoreResult<i32>;
    async fn update_user(&self, user_id: i32, changes: UserChanges) -> StoreResult<usize>;
    async fn touch_user_login(&self, user_id: i32) -> StoreResult<usize>;
    async fn delete_user(&self, user_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait AdminRepository {
    async fn list_admins(&self) -> StoreResult<Vec<AdminEntity>>;
    /// Whether at least one admin account exists.
    async fn has_admins(&self) -> StoreResult<bool>;
    async fn get_admin(&self, admin_id: i32) -> StoreResult<Option<AdminEntity>>;
    async fn find_admin_credentials(&self, email: &str)
    -> StoreResult<Option<AdminCredentials>>;
    async fn get_admin_password_hash(&self, admin_id: i32) -> StoreResult<Option<String>>;
    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<i32>;
    async fn update_admin(&self, admin_id: i32, changes: AdminChanges) -> StoreResult<usize>;
    async fn set_admin_password(&self, admin_id: i32, password_hash: String)
    -> StoreResult<usize>;
    async fn delete_admin(&self, admin_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait CategoryRepository {
    async fn list_categories(&self) -> StoreResult<Vec<CategoryEntity>>;
    async fn get_category(&self, category_id: i32) -> StoreResult<Option<CategoryEntity>>;
    async fn create_category(&self, category: NewCategory) -> StoreResult<i32>;
    async fn update_category(
        &self,
        category_id: i32,
        changes: CategoryChanges,
    ) -> StoreResult<usize>;
    async fn delete_category(&self, category_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait BrandRepository {
    async fn list_brands(&self) -> StoreResult<Vec<BrandEntity>>;
    async fn get_brand(&self, brand_id: i32) -> StoreResult<Option<BrandEntity>>;
    async fn create_brand(&self, brand: NewBrand) -> StoreResult<i32>;
    async fn update_brand(&self, brand_id: i32, changes: BrandChanges) -> StoreResult<usize>;
    async fn delete_brand(&self, brand_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait ProductRepository {
    async fn list_products(&self, filter: ProductFilter) -> StoreResult<Vec<ProductEntity>>;
    async fn get_product(&self, product_id: i32) -> StoreResult<Option<ProductEntity>>;
    async fn create_product(&self, product: NewProduct) -> StoreResult<i32>;
    async fn update_product(&self, product_id: i32, changes: ProductChanges)
    -> StoreResult<usize>;
    async fn delete_product(&self, product_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait ProductVariantRepository {
    async fn list_variants_by_product(
        &self,
        product_id: i32,
    ) -> StoreResult<Vec<ProductVariantEntity>>;
    async fn get_variant(&self, variant_id: i32) -> StoreResult<Option<ProductVariantEntity>>;
    async fn create_variant(&self, variant: NewProductVariant) -> StoreResult<i32>;
    async fn update_variant(
        &self,
        variant_id: i32,
        changes: ProductVariantChanges,
    ) -> StoreResult<usize>;
    async fn delete_variant(&self, variant_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait OrderRepository {
    async fn list_orders(&self) -> StoreResult<Vec<OrderEntity>>;
    async fn list_orders_by_user(&self, user_id: i32) -> StoreResult<Vec<OrderEntity>>;
    async fn get_order(&self, order_id: i32) -> StoreResult<Option<OrderEntity>>;
    /// The user an order belongs to, if the order exists.
    async fn order_owner(&self, order_id: i32) -> StoreResult<Option<i32>>;
    async fn create_order(&self, order: NewOrder) -> StoreResult<i32>;
    async fn update_order_status(&self, order_id: i32, status: &str) -> StoreResult<usize>;
    async fn delete_order(&self, order_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait OrderItemRepository {
    async fn list_order_items(&self) -> StoreResult<Vec<OrderItemEntity>>;
    /// Items of `order_id`, restricted to orders owned by `user_id`.
    async fn list_order_items_for_owner(
        &self,
        order_id: i32,
        user_id: i32,
    ) -> StoreResult<Vec<OrderItemEntity>>;
    /// Resolves item -> order -> user.
    async fn order_item_owner(&self, order_item_id: i32) -> StoreResult<Option<i32>>;
    async fn create_order_item(&self, item: NewOrderItem) -> StoreResult<i32>;
    async fn update_order_item(
        &self,
        order_item_id: i32,
        changes: OrderItemChanges,
    ) -> StoreResult<usize>;
    async fn delete_order_item(&self, order_item_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait PaymentRepository {
    async fn list_payments(&self) -> StoreResult<Vec<PaymentEntity>>;
    async fn list_payments_by_order(&self, order_id: i32) -> StoreResult<Vec<PaymentEntity>>;
    async fn create_payment(&self, payment: NewPayment) -> StoreResult<i32>;
    async fn update_payment_status(&self, payment_id: i32, status: &str) -> StoreResult<usize>;
    async fn delete_payment(&self, payment_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait ShoppingCartRepository {
    async fn list_carts(&self) -> StoreResult<Vec<ShoppingCartEntity>>;
    async fn get_cart(&self, cart_id: i32) -> StoreResult<Option<ShoppingCartDetails>>;
    async fn create_cart(&self, cart: NewShoppingCart) -> StoreResult<i32>;
    async fn update_cart(&self, cart_id: i32, changes: ShoppingCartChanges)
    -> StoreResult<usize>;
    async fn delete_cart(&self, cart_id: i32) -> StoreResult<usize>;
}

#[async_trait]
pub trait CartItemRepository {
    async fn list_cart_items(&self, cart_id: i32) -> StoreResult<Vec<CartItemDetails>>;
    async fn add_cart_item(&self, item: NewCartItem) -> StoreResult<i32>;
    async fn update_cart_item_quantity(&self, cart_item_id: i32, quantity: i32)
    -> StoreResult<usize>;
    async fn delete_cart_item(&self, cart_item_id: i32) -> StoreResult<usize>;
    async fn clear_cart(&self, cart_id: i32) -> StoreResult<usize>;
}

pub trait Store:
    UserRepository
    + AdminRepository
    + CategoryRepository
    + BrandRepository
    + ProductRepository
    + ProductVariantRepository
    + OrderRepository
    + OrderItemRepository
    + PaymentRepository
    + ShoppingCartRepository
    + CartItemRepository
    + Send
    + Sync
{
}

impl<T> Store for T where
    T: UserRepository
        + AdminRepository
        + CategoryRepository
        + BrandRepository
        + ProductRepository
        + ProductVariantRepository
        + OrderRepository
        + OrderItemRepository
        + PaymentRepository
        + ShoppingCartRepository
        + CartItemRepository
        + Send
        + Sync
{
}
