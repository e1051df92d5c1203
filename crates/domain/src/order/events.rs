//! Events that drive an order through its lifecycle.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseNameError;

/// A trigger delivered to an order's saga.
///
/// Events carry no payload of their own; the order id they correlate to
/// travels alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEvent {
    /// Start the saga for a freshly created order.
    CreateOrder,

    /// The payment service accepted the charge.
    PaymentSuccess,

    /// The payment service declined the charge or could not be reached.
    PaymentFailure,

    /// The inventory service reserved the stock.
    InventorySuccess,

    /// The inventory service declined the reservation or could not be reached.
    InventoryFailure,

    /// Finish an order whose every step succeeded.
    CompleteOrder,

    /// Cancel an order.
    CancelOrder,
}

impl OrderEvent {
    /// All events.
    pub const ALL: [OrderEvent; 7] = [
        OrderEvent::CreateOrder,
        OrderEvent::PaymentSuccess,
        OrderEvent::PaymentFailure,
        OrderEvent::InventorySuccess,
        OrderEvent::InventoryFailure,
        OrderEvent::CompleteOrder,
        OrderEvent::CancelOrder,
    ];

    /// Returns the event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderEvent::CreateOrder => "CREATE_ORDER",
            OrderEvent::PaymentSuccess => "PAYMENT_SUCCESS",
            OrderEvent::PaymentFailure => "PAYMENT_FAILURE",
            OrderEvent::InventorySuccess => "INVENTORY_SUCCESS",
            OrderEvent::InventoryFailure => "INVENTORY_FAILURE",
            OrderEvent::CompleteOrder => "COMPLETE_ORDER",
            OrderEvent::CancelOrder => "CANCEL_ORDER",
        }
    }
}

impl std::fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderEvent {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| ParseNameError {
                kind: "order event",
                name: s.to_string(),
            })
    }
}
