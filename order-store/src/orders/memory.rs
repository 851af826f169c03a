//! In-memory order store
//!
//! Reference [`OrdersStore`] implementation. Each store owns its own
//! collection; clones of one store share it, separately constructed stores
//! never do.

use super::identity::{calculate_order_total, generate_order_id};
use super::traits::OrdersStore;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::order::{
    Address, Order, PaymentMethod, ShipmentMethod, ShippingSpeed, StoreError, StoreResult,
};
use std::convert::Infallible;
use std::sync::Arc;

/// Order store backed by an owned `Vec<Order>`
#[derive(Clone, Default)]
pub struct MemOrdersStore {
    orders: Arc<Mutex<Vec<Order>>>,
}

impl MemOrdersStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given orders (kept in the given order)
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
        }
    }

    /// Store seeded with the two demo customers
    pub fn with_demo_orders() -> Self {
        Self::with_orders(demo_orders())
    }

    /// Number of stored orders
    pub fn len(&self) -> usize {
        self.orders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.lock().is_empty()
    }

    fn index_of(orders: &[Order], id: &str) -> Option<usize> {
        orders.iter().position(|o| o.id.as_deref() == Some(id))
    }
}

#[async_trait]
impl OrdersStore for MemOrdersStore {
    async fn fetch_orders(&self) -> StoreResult<Vec<Order>> {
        tokio::task::yield_now().await;
        Ok(self.orders.lock().clone())
    }

    async fn fetch_order(&self, id: &str) -> StoreResult<Order> {
        tokio::task::yield_now().await;
        let orders = self.orders.lock();
        Self::index_of(&orders, id)
            .map(|index| orders[index].clone())
            .ok_or_else(|| StoreError::fetch_miss(id))
    }

    async fn create_order(&self, mut order: Order) -> StoreResult<Order> {
        tokio::task::yield_now().await;
        let mut orders = self.orders.lock();

        if let Some(id) = order.id.as_deref()
            && Self::index_of(&orders, id).is_some()
        {
            tracing::warn!(order_id = %id, "Create rejected: id already exists");
            return Err(StoreError::create_failed(id));
        }

        let Ok(()) = generate_order_id(&mut order, |candidate| {
            Ok::<_, Infallible>(Self::index_of(&orders, candidate).is_some())
        });
        calculate_order_total(&mut order);

        tracing::debug!(order_id = %order.id_or_placeholder(), "Order created");
        orders.push(order.clone());
        Ok(order)
    }

    async fn update_order(&self, order: Order) -> StoreResult<Order> {
        tokio::task::yield_now().await;
        let Some(id) = order.id.clone() else {
            return Err(StoreError::update_without_id());
        };

        let mut orders = self.orders.lock();
        let index = Self::index_of(&orders, &id).ok_or_else(|| StoreError::update_miss(&id))?;
        orders[index] = order;
        tracing::debug!(order_id = %id, "Order updated");
        Ok(orders[index].clone())
    }

    async fn delete_order(&self, id: &str) -> StoreResult<Order> {
        tokio::task::yield_now().await;
        let mut orders = self.orders.lock();
        let index = Self::index_of(&orders, id).ok_or_else(|| StoreError::delete_miss(id))?;
        tracing::debug!(order_id = %id, "Order deleted");
        Ok(orders.remove(index))
    }
}

// ========== Demo data ==========

/// Demo orders (Amy Apple, Bob Battery)
pub fn demo_orders() -> Vec<Order> {
    let billing_address = Address {
        street1: "1 Infinite Loop".to_string(),
        street2: Some(String::new()),
        city: "Cupertino".to_string(),
        state: "CA".to_string(),
        zip: "95014".to_string(),
    };
    let shipment_address = Address {
        street1: "One Microsoft Way".to_string(),
        street2: Some(String::new()),
        city: "Redmond".to_string(),
        state: "WA".to_string(),
        zip: "98052-7329".to_string(),
    };
    let now = Utc::now();
    let payment_method = PaymentMethod {
        credit_card_number: "1234-123456-1234".to_string(),
        expiration_date: now,
        cvv: "999".to_string(),
    };
    let shipment_method = ShipmentMethod::new(ShippingSpeed::OneDay);

    vec![
        Order {
            first_name: "Amy".to_string(),
            last_name: "Apple".to_string(),
            phone: "111-111-1111".to_string(),
            email: "amy.apple@clean-swift.com".to_string(),
            billing_address: billing_address.clone(),
            payment_method: payment_method.clone(),
            shipment_address: shipment_address.clone(),
            shipment_method,
            id: Some("abc123".to_string()),
            date: now,
            total: Some(Decimal::new(123, 2)),
        },
        Order {
            first_name: "Bob".to_string(),
            last_name: "Battery".to_string(),
            phone: "222-222-2222".to_string(),
            email: "bob.battery@clean-swift.com".to_string(),
            billing_address,
            payment_method,
            shipment_address,
            shipment_method,
            id: Some("def456".to_string()),
            date: now,
            total: Some(Decimal::new(456, 2)),
        },
    ]
}
