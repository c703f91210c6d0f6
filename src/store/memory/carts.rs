use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, check, optional_reference, reference};
use crate::{
    models::{
        CartItemDetails, CartItemEntity, NewCartItem, NewShoppingCart, ShoppingCartChanges,
        ShoppingCartDetails, ShoppingCartEntity,
    },
    store::{CartItemRepository, ShoppingCartRepository, StoreResult},
};

#[async_trait]
impl ShoppingCartRepository for MemoryStore {
    async fn list_carts(&self) -> StoreResult<Vec<ShoppingCartEntity>> {
        Ok(self.lock()?.shopping_carts.all())
    }

    async fn get_cart(&self, cart_id: i32) -> StoreResult<Option<ShoppingCartDetails>> {
        let tables = self.lock()?;
        Ok(tables.shopping_carts.get(cart_id).map(|cart| ShoppingCartDetails {
            cart_id: cart.cart_id,
            user_id: cart.user_id,
            created_at: cart.created_at,
            admin_id: cart.admin_id,
            user_name: cart
                .user_id
                .and_then(|id| tables.users.get(id))
                .map(|row| row.entity.first_name.clone()),
            admin_name: cart
                .admin_id
                .and_then(|id| tables.admins.get(id))
                .map(|row| row.entity.first_name.clone()),
        }))
    }

    async fn create_cart(&self, cart: NewShoppingCart) -> StoreResult<i32> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        optional_reference(
            cart.user_id,
            |id| tables.users.contains(id),
            "shopping_carts_user_id_fkey",
        )?;
        tables.admin_ref(cart.admin_id, "shopping_carts_admin_id_fkey")?;

        Ok(tables.shopping_carts.insert(|cart_id| ShoppingCartEntity {
            cart_id,
            user_id: cart.user_id,
            created_at: Utc::now(),
            admin_id: cart.admin_id,
        }))
    }

    async fn update_cart(
        &self,
        cart_id: i32,
        changes: ShoppingCartChanges,
    ) -> StoreResult<usize> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        optional_reference(
            changes.user_id,
            |id| tables.users.contains(id),
            "shopping_carts_user_id_fkey",
        )?;
        tables.admin_ref(changes.admin_id, "shopping_carts_admin_id_fkey")?;

        let Some(cart) = tables.shopping_carts.get_mut(cart_id) else {
            return Ok(0);
        };
        if let Some(v) = changes.user_id {
            cart.user_id = Some(v);
        }
        if let Some(v) = changes.admin_id {
            cart.admin_id = Some(v);
        }
        Ok(1)
    }

    async fn delete_cart(&self, cart_id: i32) -> StoreResult<usize> {
        Ok(self.lock()?.delete_cart(cart_id))
    }
}

#[async_trait]
impl CartItemRepository for MemoryStore {
    async fn list_cart_items(&self, cart_id: i32) -> StoreResult<Vec<CartItemDetails>> {
        let tables = self.lock()?;
        Ok(tables
            .cart_items
            .values()
            .filter(|item| item.cart_id == cart_id)
            .filter_map(|item| {
                let product = tables.products.get(item.product_id)?;
                let variant = item
                    .variant_id
                    .and_then(|id| tables.product_variants.get(id));
                Some(CartItemDetails {
                    cart_item_id: item.cart_item_id,
                    quantity: item.quantity,
                    product_id: item.product_id,
                    variant_id: item.variant_id,
                    product_name: product.product_name.clone(),
                    size: variant.map(|v| v.size.clone()),
                    color: variant.map(|v| v.color.clone()),
                })
            })
            .collect())
    }

    async fn add_cart_item(&self, item: NewCartItem) -> StoreResult<i32> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;
        check(item.quantity > 0, "cart_items_quantity_check")?;
        reference(
            tables.shopping_carts.contains(item.cart_id),
            "cart_items_cart_id_fkey",
        )?;
        reference(
            tables.products.contains(item.product_id),
            "cart_items_product_id_fkey",
        )?;
        optional_reference(
            item.variant_id,
            |id| tables.product_variants.contains(id),
            "cart_items_variant_id_fkey",
        )?;

        Ok(tables.cart_items.insert(|cart_item_id| CartItemEntity {
            cart_item_id,
            cart_id: item.cart_id,
            product_id: item.product_id,
            variant_id: item.variant_id,
            quantity: item.quantity,
        }))
    }

    async fn update_cart_item_quantity(
        &self,
        cart_item_id: i32,
        quantity: i32,
    ) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        check(quantity > 0, "cart_items_quantity_check")?;

        let Some(item) = tables.cart_items.get_mut(cart_item_id) else {
            return Ok(0);
        };
        item.quantity = quantity;
        Ok(1)
    }

    async fn delete_cart_item(&self, cart_item_id: i32) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        Ok(usize::from(tables.cart_items.remove(cart_item_id).is_some()))
    }

    async fn clear_cart(&self, cart_id: i32) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        let before = tables.cart_items.rows.len();
        tables.cart_items.retain(|item| item.cart_id != cart_id);
        Ok(before - tables.cart_items.rows.len())
    }
}
