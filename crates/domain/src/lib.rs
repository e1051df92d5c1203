//! Domain layer for the order fulfillment saga.
//!
//! This crate provides the pieces every other crate agrees on:
//! - The `Order` record and the validated `NewOrder` request it is built from
//! - `OrderState`, the lifecycle status persisted with each order
//! - `OrderEvent`, the only trigger for moving an order between states

pub mod order;

pub use order::{
    CustomerId, NewOrder, Order, OrderError, OrderEvent, OrderState, ParseNameError, ProductId,
};
