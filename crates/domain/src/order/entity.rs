//! The persisted order record.

use chrono::{DateTime, Utc};
use common::OrderId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CustomerId, OrderError, OrderState, ProductId};

/// A validated request to place an order.
///
/// Can only be built through [`NewOrder::new`], so a `NewOrder` always has a
/// positive quantity and a non-negative amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    customer_id: CustomerId,
    product_id: ProductId,
    quantity: u32,
    amount: Decimal,
}

impl NewOrder {
    /// Validates the fields of an incoming order.
    pub fn new(
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: u32,
        amount: Decimal,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }
        if amount < Decimal::ZERO {
            return Err(OrderError::InvalidAmount { amount });
        }

        Ok(Self {
            customer_id,
            product_id,
            quantity,
            amount,
        })
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// An order as held by the order store.
///
/// The saga reads `amount` and `quantity` to build its remote calls and only
/// ever writes `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub amount: Decimal,
    pub status: OrderState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a record in `ORDER_CREATED` for a validated request.
    pub fn from_new(id: OrderId, new_order: &NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_id: new_order.customer_id,
            product_id: new_order.product_id,
            quantity: new_order.quantity,
            amount: new_order.amount,
            status: OrderState::OrderCreated,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true once the order has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves the record to a new status, bumping `updated_at`.
    pub fn set_status(&mut self, status: OrderState) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
