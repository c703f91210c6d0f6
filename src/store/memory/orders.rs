use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryStore, check, reference};
use crate::{
    models::{
        NewOrder, NewOrderItem, NewPayment, OrderEntity, OrderItemChanges, OrderItemEntity,
        PaymentEntity,
    },
    store::{OrderItemRepository, OrderRepository, PaymentRepository, StoreResult},
    validation::{OrderStatus, PaymentStatus},
};

fn order_status_check(status: &str) -> StoreResult<()> {
    check(status.parse::<OrderStatus>().is_ok(), "orders_order_status_check")
}

fn payment_status_check(status: &str) -> StoreResult<()> {
    check(status.parse::<PaymentStatus>().is_ok(), "payments_status_check")
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn list_orders(&self) -> StoreResult<Vec<OrderEntity>> {
        Ok(self.lock()?.orders.all())
    }

    async fn list_orders_by_user(&self, user_id: i32) -> StoreResult<Vec<OrderEntity>> {
        let tables = self.lock()?;
        Ok(tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_order(&self, order_id: i32) -> StoreResult<Option<OrderEntity>> {
        Ok(self.lock()?.orders.get(order_id).cloned())
    }

    async fn order_owner(&self, order_id: i32) -> StoreResult<Option<i32>> {
        Ok(self.lock()?.orders.get(order_id).map(|o| o.user_id))
    }

    async fn create_order(&self, order: NewOrder) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        check(order.total_amount >= 0.0, "orders_total_amount_check")?;
        order_status_check(&order.order_status)?;
        reference(
            tables.users.contains(order.user_id),
            "orders_user_id_fkey",
        )?;
        tables.admin_ref(order.admin_id, "orders_admin_id_fkey")?;

        Ok(tables.orders.insert(|order_id| OrderEntity {
            order_id,
            user_id: order.user_id,
            order_date: Utc::now(),
            total_amount: order.total_amount,
            order_status: order.order_status,
            admin_id: order.admin_id,
        }))
    }

    async fn update_order_status(&self, order_id: i32, status: &str) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        order_status_check(status)?;

        let Some(order) = tables.orders.get_mut(order_id) else {
            return Ok(0);
        };
        order.order_status = status.to_string();
        Ok(1)
    }

    async fn delete_order(&self, order_id: i32) -> StoreResult<usize> {
        Ok(self.lock()?.delete_order(order_id))
    }
}

#[async_trait]
impl OrderItemRepository for MemoryStore {
    async fn list_order_items(&self) -> StoreResult<Vec<OrderItemEntity>> {
        Ok(self.lock()?.order_items.all())
    }

    async fn list_order_items_for_owner(
        &self,
        order_id: i32,
        user_id: i32,
    ) -> StoreResult<Vec<OrderItemEntity>> {
        let tables = self.lock()?;
        let owned = tables
            .orders
            .get(order_id)
            .is_some_and(|o| o.user_id == user_id);
        if !owned {
            return Ok(Vec::new());
        }
        Ok(tables
            .order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn order_item_owner(&self, order_item_id: i32) -> StoreResult<Option<i32>> {
        let tables = self.lock()?;
        Ok(tables
            .order_items
            .get(order_item_id)
            .and_then(|item| tables.orders.get(item.order_id))
            .map(|order| order.user_id))
    }

    async fn create_order_item(&self, item: NewOrderItem) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        check(item.quantity > 0, "order_items_quantity_check")?;
        check(
            item.price_at_purchase >= 0.0,
            "order_items_price_at_purchase_check",
        )?;
        reference(
            tables.orders.contains(item.order_id),
            "order_items_order_id_fkey",
        )?;
        reference(
            tables.products.contains(item.product_id),
            "order_items_product_id_fkey",
        )?;
        reference(
            tables.product_variants.contains(item.variant_id),
            "order_items_variant_id_fkey",
        )?;

        Ok(tables.order_items.insert(|order_item_id| OrderItemEntity {
            order_item_id,
            order_id: item.order_id,
            product_id: item.product_id,
            variant_id: item.variant_id,
            quantity: item.quantity,
            price_at_purchase: item.price_at_purchase,
        }))
    }

    async fn update_order_item(
        &self,
        order_item_id: i32,
        changes: OrderItemChanges,
    ) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        if let Some(quantity) = changes.quantity {
            check(quantity > 0, "order_items_quantity_check")?;
        }

        let Some(item) = tables.order_items.get_mut(order_item_id) else {
            return Ok(0);
        };
        if let Some(v) = changes.quantity {
            item.quantity = v;
        }
        Ok(1)
    }

    async fn delete_order_item(&self, order_item_id: i32) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        Ok(usize::from(tables.order_items.remove(order_item_id).is_some()))
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn list_payments(&self) -> StoreResult<Vec<PaymentEntity>> {
        Ok(self.lock()?.payments.all())
    }

    async fn list_payments_by_order(&self, order_id: i32) -> StoreResult<Vec<PaymentEntity>> {
        let tables = self.lock()?;
        Ok(tables
            .payments
            .values()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn create_payment(&self, payment: NewPayment) -> StoreResult<i32> {
        let mut tables = self.lock()?;
        check(payment.amount >= 0.0, "payments_amount_check")?;
        payment_status_check(&payment.status)?;
        reference(
            tables.orders.contains(payment.order_id),
            "payments_order_id_fkey",
        )?;

        Ok(tables.payments.insert(|payment_id| PaymentEntity {
            payment_id,
            order_id: payment.order_id,
            payment_method: payment.payment_method,
            payment_date: Utc::now(),
            amount: payment.amount,
            status: payment.status,
            admin_id: None,
        }))
    }

    async fn update_payment_status(&self, payment_id: i32, status: &str) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        payment_status_check(status)?;

        let Some(payment) = tables.payments.get_mut(payment_id) else {
            return Ok(0);
        };
        payment.status = status.to_string();
        Ok(1)
    }

    async fn delete_payment(&self, payment_id: i32) -> StoreResult<usize> {
        let mut tables = self.lock()?;
        Ok(usize::from(tables.payments.remove(payment_id).is_some()))
    }
}
