//! Saga error types.

use domain::{OrderError, OrderEvent, OrderState};
use order_store::OrderStoreError;
use thiserror::Error;

/// Errors that abort a saga.
///
/// Declined or unreachable collaborators are not errors at this level: they
/// drive the saga down its failure edges and are reported as [`SagaFault`]s.
///
/// [`SagaFault`]: crate::fault::SagaFault
#[derive(Debug, Error)]
pub enum SagaError {
    /// An event was delivered in a state that has no transition for it.
    #[error("Illegal transition: no transition from {state} on {event}")]
    IllegalTransition { state: OrderState, event: OrderEvent },

    /// The order request failed validation.
    #[error("Invalid order: {0}")]
    Validation(#[from] OrderError),

    /// Order store error.
    #[error("Order store error: {0}")]
    Store(#[from] OrderStoreError),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
