use std::sync::Arc;

use async_trait::async_trait;
use domain::{Order, OrderState};

use crate::{OrderId, OrderStoreError, Result};

/// Core trait for order store implementations.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order.
    ///
    /// Fails with `AlreadyExists` if an order with the same id is stored.
    async fn create(&self, order: Order) -> Result<Order>;

    /// Retrieves an order by id.
    ///
    /// Returns None if the order doesn't exist.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Moves an order to a new status and returns the updated record.
    ///
    /// Fails with `NotFound` for unknown ids and with `TerminalState` when the
    /// stored order is already completed or failed.
    async fn update_status(&self, id: OrderId, status: OrderState) -> Result<Order>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn create(&self, order: Order) -> Result<Order> {
        (**self).create(order).await
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        (**self).get(id).await
    }

    async fn update_status(&self, id: OrderId, status: OrderState) -> Result<Order> {
        (**self).update_status(id, status).await
    }
}

/// Extension trait providing convenience methods for order stores.
#[async_trait]
pub trait OrderStoreExt: OrderStore {
    /// Retrieves an order that is expected to exist.
    async fn get_existing(&self, id: OrderId) -> Result<Order> {
        self.get(id).await?.ok_or(OrderStoreError::NotFound(id))
    }
}

// Blanket implementation for all OrderStore implementations
impl<T: OrderStore + ?Sized> OrderStoreExt for T {}
