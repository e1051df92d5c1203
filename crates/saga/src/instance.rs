//! Per-order saga instance.

use common::OrderId;
use domain::{OrderEvent, OrderState};

use crate::error::Result;
use crate::machine::{self, Transition};

/// The in-flight saga of a single order.
///
/// Owned by whoever drives the order through its saga; it is never shared,
/// which is what keeps events for one order strictly sequential. Once the
/// order reaches a terminal state the instance has nothing left to do and is
/// simply dropped.
#[derive(Debug, Clone)]
pub struct SagaInstance {
    order_id: OrderId,
    state: OrderState,
    history: Vec<Transition>,
}

impl SagaInstance {
    /// Creates a saga for a freshly created order.
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            state: OrderState::OrderCreated,
            history: Vec::new(),
        }
    }

    /// Checks `event` against the table without changing state.
    pub fn fire(&self, event: OrderEvent) -> Result<Transition> {
        machine::transition(self.state, event)
    }

    /// Moves to the target of a transition obtained from [`fire`](Self::fire).
    pub fn advance(&mut self, transition: Transition) {
        debug_assert_eq!(transition.source, self.state);
        self.state = transition.target;
        self.history.push(transition);
    }

    /// Returns the order this saga correlates to.
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Returns the current state.
    pub fn state(&self) -> OrderState {
        self.state
    }

    /// Returns true once the order has completed or failed.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns the transitions taken so far, oldest first.
    pub fn history(&self) -> &[Transition] {
        &self.history
    }
}
