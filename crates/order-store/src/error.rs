use domain::OrderState;
use thiserror::Error;

use crate::OrderId;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// An order with this id has already been stored.
    #[error("Order already exists: {0}")]
    AlreadyExists(OrderId),

    /// The order was not found in the store.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The order has reached a terminal state and can no longer change.
    #[error("Order {order_id} is already in terminal state {status}")]
    TerminalState { order_id: OrderId, status: OrderState },

    /// A stored row could not be turned back into an order.
    #[error("Corrupt order record: {0}")]
    CorruptRecord(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
