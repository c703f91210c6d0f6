use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use super::PgStore;
use crate::{
    models::{
        NewOrder, NewOrderItem, NewPayment, OrderEntity, OrderItemChanges, OrderItemEntity,
        PaymentEntity,
    },
    schema::{order_items, orders, payments},
    store::{OrderItemRepository, OrderRepository, PaymentRepository, StoreResult},
};

#[async_trait]
impl OrderRepository for PgStore {
    async fn list_orders(&self) -> StoreResult<Vec<OrderEntity>> {
        let conn = &mut self.conn().await?;

        let orders = orders::table
            .select(OrderEntity::as_select())
            .order(orders::order_id.asc())
            .load(conn)
            .await?;
        Ok(orders)
    }

    async fn list_orders_by_user(&self, user_id: i32) -> StoreResult<Vec<OrderEntity>> {
        let conn = &mut self.conn().await?;

        let orders = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderEntity::as_select())
            .order(orders::order_date.desc())
            .load(conn)
            .await?;
        Ok(orders)
    }

    async fn get_order(&self, order_id: i32) -> StoreResult<Option<OrderEntity>> {
        let conn = &mut self.conn().await?;

        let order = orders::table
            .find(order_id)
            .select(OrderEntity::as_select())
            .first(conn)
            .await
            .optional()?;
        Ok(order)
    }

    async fn order_owner(&self, order_id: i32) -> StoreResult<Option<i32>> {
        let conn = &mut self.conn().await?;

        let user_id = orders::table
            .find(order_id)
            .select(orders::user_id)
            .first(conn)
            .await
            .optional()?;
        Ok(user_id)
    }

    async fn create_order(&self, order: NewOrder) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let order_id = diesel::insert_into(orders::table)
            .values(&order)
            .returning(orders::order_id)
            .get_result(conn)
            .await?;
        Ok(order_id)
    }

    async fn update_order_status(&self, order_id: i32, status: &str) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(orders::table.find(order_id))
            .set(orders::order_status.eq(status))
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_order(&self, order_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(orders::table.find(order_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl OrderItemRepository for PgStore {
    async fn list_order_items(&self) -> StoreResult<Vec<OrderItemEntity>> {
        let conn = &mut self.conn().await?;

        let items = order_items::table
            .select(OrderItemEntity::as_select())
            .order(order_items::order_item_id.asc())
            .load(conn)
            .await?;
        Ok(items)
    }

    async fn list_order_items_for_owner(
        &self,
        order_id: i32,
        user_id: i32,
    ) -> StoreResult<Vec<OrderItemEntity>> {
        let conn = &mut self.conn().await?;

        let items = order_items::table
            .inner_join(orders::table)
            .filter(order_items::order_id.eq(order_id))
            .filter(orders::user_id.eq(user_id))
            .select(OrderItemEntity::as_select())
            .order(order_items::order_item_id.asc())
            .load(conn)
            .await?;
        Ok(items)
    }

    async fn order_item_owner(&self, order_item_id: i32) -> StoreResult<Option<i32>> {
        let conn = &mut self.conn().await?;

        let user_id = order_items::table
            .inner_join(orders::table)
            .filter(order_items::order_item_id.eq(order_item_id))
            .select(orders::user_id)
            .first(conn)
            .await
            .optional()?;
        Ok(user_id)
    }

    async fn create_order_item(&self, item: NewOrderItem) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let order_item_id = diesel::insert_into(order_items::table)
            .values(&item)
            .returning(order_items::order_item_id)
            .get_result(conn)
            .await?;
        Ok(order_item_id)
    }

    async fn update_order_item(
        &self,
        order_item_id: i32,
        changes: OrderItemChanges,
    ) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(order_items::table.find(order_item_id))
            .set(&changes)
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_order_item(&self, order_item_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(order_items::table.find(order_item_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl PaymentRepository for PgStore {
    async fn list_payments(&self) -> StoreResult<Vec<PaymentEntity>> {
        let conn = &mut self.conn().await?;

        let payments = payments::table
            .select(PaymentEntity::as_select())
            .order(payments::payment_id.asc())
            .load(conn)
            .await?;
        Ok(payments)
    }

    async fn list_payments_by_order(&self, order_id: i32) -> StoreResult<Vec<PaymentEntity>> {
        let conn = &mut self.conn().await?;

        let payments = payments::table
            .filter(payments::order_id.eq(order_id))
            .select(PaymentEntity::as_select())
            .order(payments::payment_date.asc())
            .load(conn)
            .await?;
        Ok(payments)
    }

    async fn create_payment(&self, payment: NewPayment) -> StoreResult<i32> {
        let conn = &mut self.conn().await?;

        let payment_id = diesel::insert_into(payments::table)
            .values(&payment)
            .returning(payments::payment_id)
            .get_result(conn)
            .await?;
        Ok(payment_id)
    }

    async fn update_payment_status(&self, payment_id: i32, status: &str) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let updated = diesel::update(payments::table.find(payment_id))
            .set(payments::status.eq(status))
            .execute(conn)
            .await?;
        Ok(updated)
    }

    async fn delete_payment(&self, payment_id: i32) -> StoreResult<usize> {
        let conn = &mut self.conn().await?;

        let deleted = diesel::delete(payments::table.find(payment_id))
            .execute(conn)
            .await?;
        Ok(deleted)
    }
}
