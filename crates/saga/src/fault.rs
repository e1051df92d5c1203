//! Operator-facing reports of failed remote calls.
//!
//! A timed-out or unreachable collaborator drives the saga down the same
//! failure edge as a declined request. Faults keep the two apart for whoever
//! operates the system.

use chrono::{DateTime, Utc};
use common::OrderId;
use tokio::sync::mpsc::UnboundedSender;

use crate::clients::ClientError;
use crate::machine::SagaAction;

/// What went wrong with a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The collaborator could not be reached or answered with a server error.
    Unreachable,
    /// The collaborator did not answer in time.
    TimedOut,
    /// A compensating call was answered with a refusal.
    CompensationDeclined,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::Unreachable => "unreachable",
            FaultKind::TimedOut => "timed_out",
            FaultKind::CompensationDeclined => "compensation_declined",
        }
    }
}

impl From<&ClientError> for FaultKind {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Timeout(_) => FaultKind::TimedOut,
            ClientError::Unreachable(_) | ClientError::UnexpectedStatus { .. } => {
                FaultKind::Unreachable
            }
        }
    }
}

/// A single failed remote call.
#[derive(Debug, Clone)]
pub struct SagaFault {
    pub order_id: OrderId,
    pub action: SagaAction,
    pub kind: FaultKind,
    pub detail: String,
    pub occurred_at: DateTime<Utc>,
}

impl SagaFault {
    pub fn new(
        order_id: OrderId,
        action: SagaAction,
        kind: FaultKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            order_id,
            action,
            kind,
            detail: detail.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Returns true if the fault happened while undoing a step.
    pub fn is_compensation(&self) -> bool {
        self.action.is_compensation()
    }
}

impl std::fmt::Display for SagaFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} for order {} {}: {}",
            self.action,
            self.order_id,
            self.kind.as_str(),
            self.detail
        )
    }
}

/// Sending half of the fault channel.
pub type FaultSender = UnboundedSender<SagaFault>;
