//! In-process store used by the test suite. Every statement runs under one
//! mutex and re-applies the schema's UNIQUE, CHECK and FOREIGN KEY rules,
//! including the ON DELETE actions.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::anyhow;

use super::{StoreError, StoreResult};
use crate::models::{
    AdminEntity, BrandEntity, CartItemEntity, CategoryEntity, OrderEntity, OrderItemEntity,
    PaymentEntity, ProductEntity, ProductVariantEntity, ShoppingCartEntity, UserEntity,
};

mod accounts;
mod carts;
mod catalog;
mod orders;

struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Assigns the next serial id, like a Postgres `SERIAL` column.
    fn insert(&mut self, build: impl FnOnce(i32) -> T) -> i32 {
        self.last_id += 1;
        let id = self.last_id;
        self.rows.insert(id, build(id));
        id
    }

    fn get(&self, id: i32) -> Option<&T> {
        self.rows.get(&id)
    }

    fn get_mut(&mut self, id: i32) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    fn contains(&self, id: i32) -> bool {
        self.rows.contains_key(&id)
    }

    fn remove(&mut self, id: i32) -> Option<T> {
        self.rows.remove(&id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn ids_where(&self, pred: impl Fn(&T) -> bool) -> Vec<i32> {
        self.rows
            .iter()
            .filter(|(_, row)| pred(row))
            .map(|(id, _)| *id)
            .collect()
    }

    fn retain(&mut self, pred: impl Fn(&T) -> bool) {
        self.rows.retain(|_, row| pred(row));
    }
}

#[derive(Clone)]
struct UserRow {
    entity: UserEntity,
    password_hash: String,
}

#[derive(Clone)]
struct AdminRow {
    entity: AdminEntity,
    password_hash: String,
}

#[derive(Default)]
struct Tables {
    users: Table<UserRow>,
    admins: Table<AdminRow>,
    categories: Table<CategoryEntity>,
    brands: Table<BrandEntity>,
    products: Table<ProductEntity>,
    product_variants: Table<ProductVariantEntity>,
    orders: Table<OrderEntity>,
    order_items: Table<OrderItemEntity>,
    payments: Table<PaymentEntity>,
    shopping_carts: Table<ShoppingCartEntity>,
    cart_items: Table<CartItemEntity>,
}

impl Tables {
    fn delete_user(&mut self, user_id: i32) -> usize {
        if self.users.remove(user_id).is_none() {
            return 0;
        }
        for order_id in self.orders.ids_where(|o| o.user_id == user_id) {
            self.delete_order(order_id);
        }
        for cart_id in self.shopping_carts.ids_where(|c| c.user_id == Some(user_id)) {
            self.delete_cart(cart_id);
        }
        1
    }

    fn delete_admin(&mut self, admin_id: i32) -> usize {
        if self.admins.remove(admin_id).is_none() {
            return 0;
        }
        let owned = Some(admin_id);
        self.categories
            .values_mut()
            .filter(|r| r.admin_id == owned)
            .for_each(|r| r.admin_id = None);
        self.brands
            .values_mut()
            .filter(|r| r.admin_id == owned)
            .for_each(|r| r.admin_id = None);
        self.products
            .values_mut()
            .filter(|r| r.admin_id == owned)
            .for_each(|r| r.admin_id = None);
        self.product_variants
            .values_mut()
            .filter(|r| r.admin_id == owned)
            .for_each(|r| r.admin_id = None);
        self.orders
            .values_mut()
            .filter(|r| r.admin_id == owned)
            .for_each(|r| r.admin_id = None);
        self.payments
            .values_mut()
            .filter(|r| r.admin_id == owned)
            .for_each(|r| r.admin_id = None);
        self.shopping_carts
            .values_mut()
            .filter(|r| r.admin_id == owned)
            .for_each(|r| r.admin_id = None);
        1
    }

    fn delete_category(&mut self, category_id: i32) -> usize {
        if self.categories.remove(category_id).is_none() {
            return 0;
        }
        let parent = Some(category_id);
        self.categories
            .values_mut()
            .filter(|c| c.parent_category_id == parent)
            .for_each(|c| c.parent_category_id = None);
        self.products
            .values_mut()
            .filter(|p| p.category_id == parent)
            .for_each(|p| p.category_id = None);
        1
    }

    fn delete_brand(&mut self, brand_id: i32) -> usize {
        if self.brands.remove(brand_id).is_none() {
            return 0;
        }
        self.products
            .values_mut()
            .filter(|p| p.brand_id == Some(brand_id))
            .for_each(|p| p.brand_id = None);
        1
    }

    fn delete_product(&mut self, product_id: i32) -> usize {
        if self.products.remove(product_id).is_none() {
            return 0;
        }
        for variant_id in self.product_variants.ids_where(|v| v.product_id == product_id) {
            self.delete_variant(variant_id);
        }
        self.order_items.retain(|i| i.product_id != product_id);
        self.cart_items.retain(|i| i.product_id != product_id);
        1
    }

    fn delete_variant(&mut self, variant_id: i32) -> usize {
        if self.product_variants.remove(variant_id).is_none() {
            return 0;
        }
        self.order_items.retain(|i| i.variant_id != variant_id);
        self.cart_items.retain(|i| i.variant_id != Some(variant_id));
        1
    }

    fn delete_order(&mut self, order_id: i32) -> usize {
        if self.orders.remove(order_id).is_none() {
            return 0;
        }
        self.order_items.retain(|i| i.order_id != order_id);
        self.payments.retain(|p| p.order_id != order_id);
        1
    }

    fn delete_cart(&mut self, cart_id: i32) -> usize {
        if self.shopping_carts.remove(cart_id).is_none() {
            return 0;
        }
        self.cart_items.retain(|i| i.cart_id != cart_id);
        1
    }

    fn admin_ref(&self, admin_id: Option<i32>, constraint: &str) -> StoreResult<()> {
        optional_reference(admin_id, |id| self.admins.contains(id), constraint)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Other(anyhow!("in-memory store mutex poisoned")))
    }
}

fn unique(taken: bool, constraint: &str) -> StoreResult<()> {
    if taken {
        Err(StoreError::UniqueViolation {
            constraint: constraint.to_string(),
        })
    } else {
        Ok(())
    }
}

fn reference(exists: bool, constraint: &str) -> StoreResult<()> {
    if exists {
        Ok(())
    } else {
        Err(StoreError::Other(anyhow!(
            "insert or update violates foreign key constraint \"{}\"",
            constraint
        )))
    }
}

fn optional_reference(
    id: Option<i32>,
    exists: impl Fn(i32) -> bool,
    constraint: &str,
) -> StoreResult<()> {
    match id {
        Some(id) => reference(exists(id), constraint),
        None => Ok(()),
    }
}

fn check(ok: bool, constraint: &str) -> StoreResult<()> {
    if ok {
        Ok(())
    } else {
        Err(StoreError::Other(anyhow!(
            "new row violates check constraint \"{}\"",
            constraint
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            CategoryChanges, NewAdmin, NewBrand, NewCartItem, NewCategory, NewOrder,
            NewOrderItem, NewPayment, NewProduct, NewProductVariant, NewShoppingCart, NewUser,
            ProductFilter, UserChanges,
        },
        store::{
            AdminRepository, BrandRepository, CartItemRepository, CategoryRepository,
            OrderItemRepository, OrderRepository, PaymentRepository, ProductRepository,
            ProductVariantRepository, ShoppingCartRepository, UserRepository,
        },
    };

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ayesha".to_string(),
            last_name: "Khan".to_string(),
            email: email.to_string(),
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

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            product_name: name.to_string(),
            description: None,
            price: 10.0,
            stock_quantity: 5,
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
            size: "M".to_string(),
            color: "Red".to_string(),
            price: 12.5,
            stock_quantity: 3,
            admin_id: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@b.com")).await.unwrap();

        let err = store.create_user(new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { ref constraint } if constraint == "users_email_key"));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_email_collision() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@b.com")).await.unwrap();
        let second = store.create_user(new_user("c@d.com")).await.unwrap();

        let changes = UserChanges {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let err = store.update_user(second, changes).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        // Re-saving your own email is not a collision.
        let changes = UserChanges {
            email: Some("c@d.com".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update_user(second, changes).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_category_delete_orphans_children() {
        let store = MemoryStore::new();
        let parent = store
            .create_category(NewCategory {
                category_name: "Clothing".to_string(),
                description: None,
                parent_category_id: None,
                admin_id: None,
            })
            .await
            .unwrap();
        let child = store
            .create_category(NewCategory {
                category_name: "Shirts".to_string(),
                description: None,
                parent_category_id: Some(parent),
                admin_id: None,
            })
            .await
            .unwrap();

        assert_eq!(store.delete_category(parent).await.unwrap(), 1);

        let child = store.get_category(child).await.unwrap().unwrap();
        assert_eq!(child.parent_category_id, None);
        assert!(store.get_category(parent).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_category_parent_must_exist() {
        let store = MemoryStore::new();
        let id = store
            .create_category(NewCategory {
                category_name: "Root".to_string(),
                description: None,
                parent_category_id: None,
                admin_id: None,
            })
            .await
            .unwrap();

        let changes = CategoryChanges {
            parent_category_id: Some(99),
            ..Default::default()
        };
        assert!(matches!(
            store.update_category(id, changes).await,
            Err(StoreError::Other(_))
        ));
    }

    #[tokio::test]
    async fn test_product_delete_cascades() {
        let store = MemoryStore::new();
        let user_id = store.create_user(new_user("a@b.com")).await.unwrap();
        let product_id = store.create_product(new_product("Kurta")).await.unwrap();
        let variant_id = store.create_variant(new_variant(product_id)).await.unwrap();
        let order_id = store
            .create_order(NewOrder {
                user_id,
                total_amount: 25.0,
                order_status: "Pending".to_string(),
                admin_id: None,
            })
            .await
            .unwrap();
        store
            .create_order_item(NewOrderItem {
                order_id,
                product_id,
                variant_id,
                quantity: 2,
                price_at_purchase: 12.5,
            })
            .await
            .unwrap();
        let cart_id = store.create_cart(NewShoppingCart::default()).await.unwrap();
        store
            .add_cart_item(NewCartItem {
                cart_id,
                product_id,
                variant_id: None,
                quantity: 1,
            })
            .await
            .unwrap();

        assert_eq!(store.delete_product(product_id).await.unwrap(), 1);

        assert!(store.get_variant(variant_id).await.unwrap().is_none());
        assert!(store.list_order_items().await.unwrap().is_empty());
        assert!(store.list_cart_items(cart_id).await.unwrap().is_empty());
        assert!(store.get_order(order_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let store = MemoryStore::new();
        let user_id = store.create_user(new_user("a@b.com")).await.unwrap();
        let order_id = store
            .create_order(NewOrder {
                user_id,
                total_amount: 10.0,
                order_status: "Pending".to_string(),
                admin_id: None,
            })
            .await
            .unwrap();
        store
            .create_payment(NewPayment {
                order_id,
                payment_method: "Card".to_string(),
                amount: 10.0,
                status: "Pending".to_string(),
            })
            .await
            .unwrap();
        let cart_id = store
            .create_cart(NewShoppingCart {
                user_id: Some(user_id),
                admin_id: None,
            })
            .await
            .unwrap();

        assert_eq!(store.delete_user(user_id).await.unwrap(), 1);
        assert_eq!(store.delete_user(user_id).await.unwrap(), 0);

        assert!(store.get_order(order_id).await.unwrap().is_none());
        assert!(store.list_payments().await.unwrap().is_empty());
        assert!(store.get_cart(cart_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_has_admins() {
        let store = MemoryStore::new();
        assert!(!store.has_admins().await.unwrap());

        let admin_id = store
            .create_admin(NewAdmin {
                first_name: "Sara".to_string(),
                last_name: "Ali".to_string(),
                email: "sara@shop.pk".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        assert!(store.has_admins().await.unwrap());

        store.delete_admin(admin_id).await.unwrap();
        assert!(!store.has_admins().await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_delete_nulls_provenance() {
        let store = MemoryStore::new();
        let admin_id = store
            .create_admin(NewAdmin {
                first_name: "Sara".to_string(),
                last_name: "Ali".to_string(),
                email: "sara@shop.pk".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let brand_id = store
            .create_brand(NewBrand {
                brand_name: "Khaadi".to_string(),
                description: None,
                admin_id: Some(admin_id),
            })
            .await
            .unwrap();

        assert_eq!(store.delete_admin(admin_id).await.unwrap(), 1);

        let brand = store.get_brand(brand_id).await.unwrap().unwrap();
        assert_eq!(brand.admin_id, None);
    }

    #[tokio::test]
    async fn test_check_constraints() {
        let store = MemoryStore::new();

        let mut product = new_product("Broken");
        product.price = -1.0;
        assert!(store.create_product(product).await.is_err());

        let product_id = store.create_product(new_product("Ok")).await.unwrap();
        let mut variant = new_variant(product_id);
        variant.stock_quantity = -2;
        assert!(store.create_variant(variant).await.is_err());

        let user_id = store.create_user(new_user("a@b.com")).await.unwrap();
        let bad_status = store
            .create_order(NewOrder {
                user_id,
                total_amount: 1.0,
                order_status: "Lost".to_string(),
                admin_id: None,
            })
            .await;
        assert!(bad_status.is_err());
    }

    #[tokio::test]
    async fn test_order_for_missing_user_is_fk_failure() {
        let store = MemoryStore::new();
        let err = store
            .create_order(NewOrder {
                user_id: 42,
                total_amount: 1.0,
                order_status: "Pending".to_string(),
                admin_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Other(_)));
    }

    #[tokio::test]
    async fn test_product_filter() {
        let store = MemoryStore::new();
        let brand_id = store
            .create_brand(NewBrand {
                brand_name: "Gul Ahmed".to_string(),
                description: None,
                admin_id: None,
            })
            .await
            .unwrap();
        let mut branded = new_product("Lawn");
        branded.brand_id = Some(brand_id);
        store.create_product(branded).await.unwrap();
        let mut hidden = new_product("Old stock");
        hidden.status = false;
        store.create_product(hidden).await.unwrap();

        let by_brand = store
            .list_products(ProductFilter {
                brand_id: Some(brand_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_brand.len(), 1);
        assert_eq!(by_brand[0].product_name, "Lawn");

        let inactive = store
            .list_products(ProductFilter {
                status: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(store.list_products(ProductFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_order_item_owner_resolution() {
        let store = MemoryStore::new();
        let user_id = store.create_user(new_user("a@b.com")).await.unwrap();
        let product_id = store.create_product(new_product("Kurta")).await.unwrap();
        let variant_id = store.create_variant(new_variant(product_id)).await.unwrap();
        let order_id = store
            .create_order(NewOrder {
                user_id,
                total_amount: 25.0,
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
                price_at_purchase: 12.5,
            })
            .await
            .unwrap();

        assert_eq!(store.order_owner(order_id).await.unwrap(), Some(user_id));
        assert_eq!(store.order_item_owner(item_id).await.unwrap(), Some(user_id));
        assert_eq!(store.order_item_owner(item_id + 1).await.unwrap(), None);
        assert_eq!(
            store
                .list_order_items_for_owner(order_id, user_id)
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(
            store
                .list_order_items_for_owner(order_id, user_id + 1)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_cart_item_details_join() {
        let store = MemoryStore::new();
        let user_id = store.create_user(new_user("a@b.com")).await.unwrap();
        let product_id = store.create_product(new_product("Kurta")).await.unwrap();
        let variant_id = store.create_variant(new_variant(product_id)).await.unwrap();
        let cart_id = store
            .create_cart(NewShoppingCart {
                user_id: Some(user_id),
                admin_id: None,
            })
            .await
            .unwrap();
        store
            .add_cart_item(NewCartItem {
                cart_id,
                product_id,
                variant_id: Some(variant_id),
                quantity: 2,
            })
            .await
            .unwrap();
        store
            .add_cart_item(NewCartItem {
                cart_id,
                product_id,
                variant_id: None,
                quantity: 1,
            })
            .await
            .unwrap();

        let items = store.list_cart_items(cart_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, "Kurta");
        assert_eq!(items[0].size.as_deref(), Some("M"));
        assert_eq!(items[1].color, None);

        let cart = store.get_cart(cart_id).await.unwrap().unwrap();
        assert_eq!(cart.user_name.as_deref(), Some("Ayesha"));
        assert_eq!(cart.admin_name, None);

        assert_eq!(store.clear_cart(cart_id).await.unwrap(), 2);
        assert_eq!(store.clear_cart(cart_id).await.unwrap(), 0);
    }
}
