use chrono::{DateTime, Utc};
use diesel::{
    Selectable,
    prelude::{AsChangeset, Identifiable, Insertable, Queryable},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// Users

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::users)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserEntity {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub date_created: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub street_address: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub gmaplink: Option<String>,
}

/// Login lookup row. Never serialized.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserCredentials {
    pub user_id: i32,
    pub password_hash: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub street_address: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub gmaplink: Option<String>,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub gmaplink: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.phone_number1.is_none()
            && self.phone_number2.is_none()
            && self.street_address.is_none()
            && self.city.is_none()
            && self.province.is_none()
            && self.country.is_none()
            && self.gmaplink.is_none()
    }
}

// Admins

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::admins)]
#[diesel(primary_key(admin_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdminEntity {
    pub admin_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdminCredentials {
    pub admin_id: i32,
    pub password_hash: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::admins)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::schema::admins)]
pub struct AdminChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl AdminChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

// Categories

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(primary_key(category_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryEntity {
    pub category_id: i32,
    pub category_name: String,
    pub description: Option<String>,
    pub parent_category_id: Option<i32>,
    pub admin_id: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub category_name: String,
    pub description: Option<String>,
    pub parent_category_id: Option<i32>,
    pub admin_id: Option<i32>,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
pub struct CategoryChanges {
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub parent_category_id: Option<i32>,
    pub admin_id: Option<i32>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.category_name.is_none()
            && self.description.is_none()
            && self.parent_category_id.is_none()
            && self.admin_id.is_none()
    }
}

// Brands

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::brands)]
#[diesel(primary_key(brand_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BrandEntity {
    pub brand_id: i32,
    pub brand_name: String,
    pub description: Option<String>,
    pub admin_id: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::brands)]
pub struct NewBrand {
    pub brand_name: String,
    pub description: Option<String>,
    pub admin_id: Option<i32>,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::schema::brands)]
pub struct BrandChanges {
    pub brand_name: Option<String>,
    pub description: Option<String>,
    pub admin_id: Option<i32>,
}

impl BrandChanges {
    pub fn is_empty(&self) -> bool {
        self.brand_name.is_none() && self.description.is_none() && self.admin_id.is_none()
    }
}

// Products

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::products)]
#[diesel(primary_key(product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductEntity {
    pub product_id: i32,
    pub product_name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
    pub status: bool,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub admin_id: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub product_name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
    pub status: bool,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub admin_id: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChanges {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub status: Option<bool>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub admin_id: Option<i32>,
    pub image_url: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock_quantity.is_none()
            && self.status.is_none()
            && self.category_id.is_none()
            && self.brand_id.is_none()
            && self.admin_id.is_none()
            && self.image_url.is_none()
    }
}

/// Optional filters accepted by the product listing.
#[derive(Deserialize, Default, Debug, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub status: Option<bool>,
}

// Product variants

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::product_variants)]
#[diesel(primary_key(variant_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductVariantEntity {
    pub variant_id: i32,
    pub product_id: i32,
    pub size: String,
    pub color: String,
    pub price: f64,
    pub stock_quantity: i32,
    pub admin_id: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::product_variants)]
pub struct NewProductVariant {
    pub product_id: i32,
    pub size: String,
    pub color: String,
    pub price: f64,
    pub stock_quantity: i32,
    pub admin_id: Option<i32>,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::schema::product_variants)]
pub struct ProductVariantChanges {
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub admin_id: Option<i32>,
}

impl ProductVariantChanges {
    pub fn is_empty(&self) -> bool {
        self.size.is_none()
            && self.color.is_none()
            && self.price.is_none()
            && self.stock_quantity.is_none()
            && self.admin_id.is_none()
    }
}

// Orders

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(primary_key(order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderEntity {
    pub order_id: i32,
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
    pub total_amount: f64,
    pub order_status: String,
    pub admin_id: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub user_id: i32,
    pub total_amount: f64,
    pub order_status: String,
    pub admin_id: Option<i32>,
}

// Order items

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(primary_key(order_item_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemEntity {
    pub order_item_id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub variant_id: i32,
    pub quantity: i32,
    pub price_at_purchase: f64,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub variant_id: i32,
    pub quantity: i32,
    pub price_at_purchase: f64,
}

/// `price_at_purchase` is a purchase-time snapshot and has no counterpart here.
#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::schema::order_items)]
pub struct OrderItemChanges {
    pub quantity: Option<i32>,
}

impl OrderItemChanges {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none()
    }
}

// Payments

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(primary_key(payment_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentEntity {
    pub payment_id: i32,
    pub order_id: i32,
    pub payment_method: String,
    pub payment_date: DateTime<Utc>,
    pub amount: f64,
    pub status: String,
    pub admin_id: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPayment {
    pub order_id: i32,
    pub payment_method: String,
    pub amount: f64,
    pub status: String,
}

// Shopping carts

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::shopping_carts)]
#[diesel(primary_key(cart_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShoppingCartEntity {
    pub cart_id: i32,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub admin_id: Option<i32>,
}

/// Cart row joined with the first names of its owning user and admin.
#[derive(Queryable, Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ShoppingCartDetails {
    pub cart_id: i32,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub admin_id: Option<i32>,
    pub user_name: Option<String>,
    pub admin_name: Option<String>,
}

#[derive(Insertable, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::shopping_carts)]
pub struct NewShoppingCart {
    pub user_id: Option<i32>,
    pub admin_id: Option<i32>,
}

#[derive(AsChangeset, Default, Debug, Clone)]
#[diesel(table_name = crate::schema::shopping_carts)]
pub struct ShoppingCartChanges {
    pub user_id: Option<i32>,
    pub admin_id: Option<i32>,
}

impl ShoppingCartChanges {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.admin_id.is_none()
    }
}

// Cart items

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::cart_items)]
#[diesel(primary_key(cart_item_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemEntity {
    pub cart_item_id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub quantity: i32,
}

/// Cart item joined with its product name and, when present, the variant's size and color.
#[derive(Queryable, Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CartItemDetails {
    pub cart_item_id: i32,
    pub quantity: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub product_name: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem {
    pub cart_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub quantity: i32,
}
