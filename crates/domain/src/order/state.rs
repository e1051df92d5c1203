//! Order lifecycle states.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseNameError;

/// The status of an order as persisted in the order store.
///
/// State transitions:
/// ```text
/// OrderCreated ──► PaymentPending ──► PaymentCompleted ──► InventoryReserved ──► OrderCompleted
///                        │                   │
///                        └───────────────────┴──► OrderFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Order accepted and persisted, saga not yet started.
    #[default]
    OrderCreated,

    /// Payment is being charged.
    PaymentPending,

    /// Payment charged, inventory is being reserved.
    PaymentCompleted,

    /// Inventory reserved, order is about to complete.
    InventoryReserved,

    /// Order fulfilled (terminal state).
    OrderCompleted,

    /// Order abandoned after a declined or failed step (terminal state).
    OrderFailed,
}

impl OrderState {
    /// All states, in lifecycle order.
    pub const ALL: [OrderState; 6] = [
        OrderState::OrderCreated,
        OrderState::PaymentPending,
        OrderState::PaymentCompleted,
        OrderState::InventoryReserved,
        OrderState::OrderCompleted,
        OrderState::OrderFailed,
    ];

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::OrderCompleted | OrderState::OrderFailed)
    }

    /// Returns the persisted state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::OrderCreated => "ORDER_CREATED",
            OrderState::PaymentPending => "PAYMENT_PENDING",
            OrderState::PaymentCompleted => "PAYMENT_COMPLETED",
            OrderState::InventoryReserved => "INVENTORY_RESERVED",
            OrderState::OrderCompleted => "ORDER_COMPLETED",
            OrderState::OrderFailed => "ORDER_FAILED",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderState {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseNameError {
                kind: "order state",
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_order_created() {
        assert_eq!(OrderState::default(), OrderState::OrderCreated);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrderState::OrderCreated.is_terminal());
        assert!(!OrderState::PaymentPending.is_terminal());
        assert!(!OrderState::PaymentCompleted.is_terminal());
        assert!(!OrderState::InventoryReserved.is_terminal());
        assert!(OrderState::OrderCompleted.is_terminal());
        assert!(OrderState::OrderFailed.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderState::OrderCreated.to_string(), "ORDER_CREATED");
        assert_eq!(OrderState::PaymentPending.to_string(), "PAYMENT_PENDING");
        assert_eq!(OrderState::PaymentCompleted.to_string(), "PAYMENT_COMPLETED");
        assert_eq!(OrderState::InventoryReserved.to_string(), "INVENTORY_RESERVED");
        assert_eq!(OrderState::OrderCompleted.to_string(), "ORDER_COMPLETED");
        assert_eq!(OrderState::OrderFailed.to_string(), "ORDER_FAILED");
    }

    #[test]
    fn test_parse_matches_display() {
        for state in OrderState::ALL {
            assert_eq!(state.as_str().parse::<OrderState>().unwrap(), state);
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "SHIPPED".parse::<OrderState>().unwrap_err();
        assert_eq!(err.name, "SHIPPED");
    }

    #[test]
    fn test_serde_uses_persisted_names() {
        let json = serde_json::to_string(&OrderState::PaymentCompleted).unwrap();
        assert_eq!(json, "\"PAYMENT_COMPLETED\"");
        let state: OrderState = serde_json::from_str("\"ORDER_FAILED\"").unwrap();
        assert_eq!(state, OrderState::OrderFailed);
    }
}
