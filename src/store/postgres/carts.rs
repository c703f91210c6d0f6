use async_trait::async_trait;
use diesel::{
    ExpressionMethods, NullableExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper,
};
use diesel_async::RunQueryDsl;

use super::PgStore;
use crate::{
    models::{
        CartItemDetails, NewCartItem, NewShoppingCart, ShoppingCartChanges, ShoppingCartDetails,
        ShoppingCartEntity,
    },
    schema::{admins, cart_items, product_variants, products, shopping_carts, users},
    store::{CartItemRepository, ShoppingCartRepository, StoreResult},
};

#[async_trait]
impl ShoppingCartRepository for PgStore {
    async fn list_carts(&self) -> StoreResult<Vec<ShoppingCartEntity>> {
        let conn = &mut self.conn().await?;

        let carts = shopping_carts::table
            .select(ShoppingCartEntity::as_select())
            .order(shopping_carts::cart_id.asc())
            .load(conn)
            .await?;
        Ok(carts)
    }

    async fn get_cart(&self, cart_id: i32) -> StoreResult<Option<ShoppingCartDetails>> {
        let conn = &mut self.conn().await?;

        let cart = shopping_carts::table
            .left_join(users::table)
            .left_join(admins::table)
            .filter(shopping_carts::cart_id.eq(cart_id))
            .select((
                shopping_carts::cart_id,
                shopping_carts::user_id,
                shopping_carts::created_at,
                shopping_carts::admin_id,
                users::first_name.nullable(),
                admins::first_name.nullable(),
            ))
            .first::<ShoppingCartDetails>(conn)
            .await
            .optional()?;
        Ok(cart)
    }

    async fn create_cart(&self, cart: NewShoppingCart) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let cart_id = diesel::insert_into(shopping_carts::table)
            .values(&cart)
            .returning(shopping_carts::cart_id)
            .get_result(conn)
            .await?;
        Ok(cart_id)
    }

    async fn update_cart(
        &self,
        cart_id: i32,
        changes: ShoppingCartChanges,
    ) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(shopping_carts::table.find(cart_id))
            .set(&changes)
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_cart(&self, cart_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(shopping_carts::table.find(cart_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl CartItemRepository for PgStore {
    async fn list_cart_items(&self, cart_id: i32) -> StoreResult<Vec<CartItemDetails>> {
        let conn = &mut self.conn().await?;

        let items = cart_items::table
            .inner_join(products::table)
            .left_join(product_variants::table)
            .filter(cart_items::cart_id.eq(cart_id))
            .select((
                cart_items::cart_item_id,
                cart_items::quantity,
                cart_items::product_id,
                cart_items::variant_id,
                products::product_name,
                product_variants::size.nullable(),
                product_variants::color.nullable(),
            ))
            .order(cart_items::cart_item_id.asc())
            .load::<CartItemDetails>(conn)
            .await?;
        Ok(items)
    }

    async fn add_cart_item(&self, item: NewCartItem) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let cart_item_id = diesel::insert_into(cart_items::table)
            .values(&item)
            .returning(cart_items::cart_item_id)
            .get_result(conn)
            .await?;
        Ok(cart_item_id)
    }

    async fn update_cart_item_quantity(
        &self,
        cart_item_id: i32,
        quantity: i32,
    ) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(cart_items::table.find(cart_item_id))
            .set(cart_items::quantity.eq(quantity))
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_cart_item(&self, cart_item_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(cart_items::table.find(cart_item_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }

    async fn clear_cart(&self, cart_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart_id)))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}
