//! Order store contract
//!
//! Every storage backend implements [`OrdersStore`]. Each operation resolves
//! exactly once with either the value or a [`StoreError`]; callers must not
//! assume the work happens before the call returns.

use async_trait::async_trait;
use shared::order::{Order, StoreResult};

#[cfg(doc)]
use shared::order::StoreError;

/// CRUD contract for order backends
#[async_trait]
pub trait OrdersStore: Send + Sync {
    /// 获取全部订单 (store-defined order; insertion order for built-in stores)
    async fn fetch_orders(&self) -> StoreResult<Vec<Order>>;

    /// Fetch one order, `CannotFetch` if the id is unknown
    async fn fetch_order(&self, id: &str) -> StoreResult<Order>;

    /// Persist a new order
    ///
    /// A missing id is replaced with a fresh unique one and a missing total
    /// with the default of one unit. Returns the order as stored.
    async fn create_order(&self, order: Order) -> StoreResult<Order>;

    /// Replace the stored order with the same id, `CannotUpdate` if absent
    async fn update_order(&self, order: Order) -> StoreResult<Order>;

    /// Remove and return the stored order, `CannotDelete` if absent
    async fn delete_order(&self, id: &str) -> StoreResult<Order>;
}
