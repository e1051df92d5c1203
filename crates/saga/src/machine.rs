//! Transition table for the order fulfillment saga.
//!
//! ```text
//! ORDER_CREATED      --CREATE_ORDER-->      PAYMENT_PENDING     [charge payment]
//! PAYMENT_PENDING    --PAYMENT_SUCCESS-->   PAYMENT_COMPLETED   [reserve inventory]
//! PAYMENT_PENDING    --PAYMENT_FAILURE-->   ORDER_FAILED
//! PAYMENT_COMPLETED  --INVENTORY_SUCCESS--> INVENTORY_RESERVED  (then COMPLETE_ORDER)
//! PAYMENT_COMPLETED  --INVENTORY_FAILURE--> ORDER_FAILED        [compensate payment]
//! INVENTORY_RESERVED --COMPLETE_ORDER-->    ORDER_COMPLETED
//! ```
//!
//! Actions run on entry to the target state. Forward actions answer with the
//! next event; compensating actions are best-effort and never feed an event
//! back into the machine.

use std::collections::HashMap;
use std::sync::LazyLock;

use domain::{OrderEvent, OrderState};

use crate::error::SagaError;

/// Side effect bound to entering a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SagaAction {
    /// Charge the order amount through the payment service.
    ChargePayment,

    /// Reserve the order quantity through the inventory service.
    ReserveInventory,

    /// Cancel a previously accepted charge.
    CompensatePayment,

    /// Release a previously accepted reservation.
    ///
    /// Not bound to any edge: reserving inventory is the last forward step, so
    /// nothing can fail after it. A step added after inventory must bind this
    /// to its failure edge.
    CompensateInventory,
}

impl SagaAction {
    /// Returns true for compensating (undo) actions.
    pub fn is_compensation(&self) -> bool {
        matches!(
            self,
            SagaAction::CompensatePayment | SagaAction::CompensateInventory
        )
    }

    /// Returns the action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaAction::ChargePayment => "charge_payment",
            SagaAction::ReserveInventory => "reserve_inventory",
            SagaAction::CompensatePayment => "compensate_payment",
            SagaAction::CompensateInventory => "compensate_inventory",
        }
    }
}

impl std::fmt::Display for SagaAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub source: OrderState,
    pub event: OrderEvent,
    pub target: OrderState,
    /// Action executed on entering `target`.
    pub action: Option<SagaAction>,
    /// Event the engine emits itself on entering `target`, without any remote call.
    pub follow_up: Option<OrderEvent>,
}

impl Transition {
    const fn edge(source: OrderState, event: OrderEvent, target: OrderState) -> Self {
        Self {
            source,
            event,
            target,
            action: None,
            follow_up: None,
        }
    }

    const fn on_entry(mut self, action: SagaAction) -> Self {
        self.action = Some(action);
        self
    }

    const fn then(mut self, event: OrderEvent) -> Self {
        self.follow_up = Some(event);
        self
    }
}

const ROWS: [Transition; 6] = [
    Transition::edge(
        OrderState::OrderCreated,
        OrderEvent::CreateOrder,
        OrderState::PaymentPending,
    )
    .on_entry(SagaAction::ChargePayment),
    Transition::edge(
        OrderState::PaymentPending,
        OrderEvent::PaymentSuccess,
        OrderState::PaymentCompleted,
    )
    .on_entry(SagaAction::ReserveInventory),
    Transition::edge(
        OrderState::PaymentPending,
        OrderEvent::PaymentFailure,
        OrderState::OrderFailed,
    ),
    Transition::edge(
        OrderState::PaymentCompleted,
        OrderEvent::InventorySuccess,
        OrderState::InventoryReserved,
    )
    .then(OrderEvent::CompleteOrder),
    Transition::edge(
        OrderState::PaymentCompleted,
        OrderEvent::InventoryFailure,
        OrderState::OrderFailed,
    )
    .on_entry(SagaAction::CompensatePayment),
    Transition::edge(
        OrderState::InventoryReserved,
        OrderEvent::CompleteOrder,
        OrderState::OrderCompleted,
    ),
];

static TABLE: LazyLock<HashMap<(OrderState, OrderEvent), Transition>> = LazyLock::new(|| {
    ROWS.iter()
        .map(|row| ((row.source, row.event), *row))
        .collect()
});

/// Looks up the transition for `event` delivered in `state`.
///
/// Pure: fails with `IllegalTransition` for any pair missing from the table,
/// which includes every event delivered to a terminal state.
pub fn transition(state: OrderState, event: OrderEvent) -> Result<Transition, SagaError> {
    TABLE
        .get(&(state, event))
        .copied()
        .ok_or(SagaError::IllegalTransition { state, event })
}

/// Returns every row of the transition table.
pub fn transitions() -> &'static [Transition] {
    &ROWS
}
