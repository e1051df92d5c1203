//! Persistence of order records.
//!
//! The saga orchestrator only needs three operations from its store: create a
//! record, read it back, and move its status. Each status write touches a
//! single row keyed by order id, so no cross-order locking is required.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::OrderId;
pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use store::{OrderStore, OrderStoreExt};
