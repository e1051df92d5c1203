use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{Order, OrderState};
use tokio::sync::RwLock;

use crate::{OrderId, OrderStoreError, Result, store::OrderStore};

#[derive(Debug, Default)]
struct Rows {
    orders: HashMap<OrderId, Order>,
    /// Every status written per order, creation included.
    history: HashMap<OrderId, Vec<OrderState>>,
}

/// In-memory order store implementation.
///
/// Used by tests and by the API binary when no database is configured.
/// Behaves like the PostgreSQL implementation, including the terminal-state
/// guard on status updates.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    rows: Arc<RwLock<Rows>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.rows.read().await.orders.len()
    }

    /// Returns every status written for an order, oldest first.
    pub async fn status_history(&self, id: OrderId) -> Vec<OrderState> {
        self.rows
            .read()
            .await
            .history
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        let mut rows = self.rows.write().await;
        rows.orders.clear();
        rows.history.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn create(&self, order: Order) -> Result<Order> {
        let mut rows = self.rows.write().await;

        if rows.orders.contains_key(&order.id) {
            return Err(OrderStoreError::AlreadyExists(order.id));
        }

        rows.history.insert(order.id, vec![order.status]);
        rows.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.rows.read().await.orders.get(&id).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, id: OrderId, status: OrderState) -> Result<Order> {
        let mut rows = self.rows.write().await;

        let order = rows
            .orders
            .get_mut(&id)
            .ok_or(OrderStoreError::NotFound(id))?;

        if order.is_terminal() {
            return Err(OrderStoreError::TerminalState {
                order_id: id,
                status: order.status,
            });
        }

        order.set_status(status);
        let updated = order.clone();
        rows.history.entry(id).or_default().push(status);
        Ok(updated)
    }
}
