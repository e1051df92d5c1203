//! Order record and related types.

mod entity;
mod events;
mod state;
mod value_objects;

pub use entity::{NewOrder, Order};
pub use events::OrderEvent;
pub use state::OrderState;
pub use value_objects::{CustomerId, ProductId};

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating an incoming order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// A required field was not supplied.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Invalid amount.
    #[error("Invalid amount: {amount} (must not be negative)")]
    InvalidAmount { amount: Decimal },
}

/// Error returned when parsing an unknown state or event name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown {kind} name: {name}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub name: String,
}
