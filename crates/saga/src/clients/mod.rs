//! Outbound clients for the payment and inventory services.
//!
//! Every call answers with a [`StepOutcome`] when the service responded and
//! with a [`ClientError`] when it could not be reached in time. A declined
//! charge or reservation is an outcome, not an error.

pub mod http;
pub mod inventory;
pub mod payment;

use std::time::Duration;

use thiserror::Error;

pub use http::HttpCaller;
pub use inventory::{HttpInventoryClient, InMemoryInventoryClient, InventoryCall, InventoryClient};
pub use payment::{HttpPaymentClient, InMemoryPaymentClient, PaymentCall, PaymentClient};

/// Business-level answer from a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The collaborator performed the step.
    Accepted,
    /// The collaborator refused the step, with its stated reason.
    Declined(String),
}

impl StepOutcome {
    /// Returns true if the step was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, StepOutcome::Accepted)
    }
}

/// Transport-level failure talking to a collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// No response within the allotted time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection refused, reset, or otherwise failed.
    #[error("Service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a server error.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}
