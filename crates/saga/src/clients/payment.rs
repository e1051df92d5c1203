//! Payment service client trait and implementations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;
use rust_decimal::Decimal;

use super::{ClientError, HttpCaller, StepOutcome};

/// Amount above which the payment service declines a charge.
pub const PAYMENT_LIMIT: Decimal = Decimal::ONE_THOUSAND;

/// Trait for payment operations used by the saga.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Charges `amount` for an order.
    async fn charge(&self, order_id: OrderId, amount: Decimal) -> Result<StepOutcome, ClientError>;

    /// Cancels the charge made for an order.
    async fn cancel(&self, order_id: OrderId) -> Result<StepOutcome, ClientError>;
}

#[async_trait]
impl<T: PaymentClient + ?Sized> PaymentClient for Arc<T> {
    async fn charge(&self, order_id: OrderId, amount: Decimal) -> Result<StepOutcome, ClientError> {
        (**self).charge(order_id, amount).await
    }

    async fn cancel(&self, order_id: OrderId) -> Result<StepOutcome, ClientError> {
        (**self).cancel(order_id).await
    }
}

/// Payment client talking to the payment service over HTTP.
///
/// `POST {base}/payment?orderId=..&amount=..` and
/// `POST {base}/payment/cancel?orderId=..`.
#[derive(Debug, Clone)]
pub struct HttpPaymentClient {
    http: HttpCaller,
}

impl HttpPaymentClient {
    /// Creates a client for the payment service at `base_url`.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            http: HttpCaller::new(base_url, request_timeout),
        }
    }

    /// Creates a client on top of an existing caller.
    pub fn from_caller(http: HttpCaller) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    #[tracing::instrument(skip(self), fields(service = "payment"))]
    async fn charge(&self, order_id: OrderId, amount: Decimal) -> Result<StepOutcome, ClientError> {
        self.http
            .post(
                "/payment",
                &[
                    ("orderId", order_id.to_string()),
                    ("amount", amount.to_string()),
                ],
            )
            .await
    }

    #[tracing::instrument(skip(self), fields(service = "payment"))]
    async fn cancel(&self, order_id: OrderId) -> Result<StepOutcome, ClientError> {
        self.http
            .post("/payment/cancel", &[("orderId", order_id.to_string())])
            .await
    }
}

/// A call received by [`InMemoryPaymentClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentCall {
    Charge { order_id: OrderId, amount: Decimal },
    Cancel { order_id: OrderId },
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    calls: Vec<PaymentCall>,
    latency: Option<Duration>,
    unreachable: bool,
    cancel_unreachable: bool,
}

/// In-memory payment client applying the payment service's rules.
///
/// Declines charges above [`PAYMENT_LIMIT`], always accepts cancellations,
/// and records every call it receives.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentClient {
    state: Arc<Mutex<InMemoryPaymentState>>,
}

impl InMemoryPaymentClient {
    /// Creates a new in-memory payment client.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryPaymentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delays every call by `latency` before answering.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = Some(latency);
    }

    /// Makes every call fail as if the service were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    /// Makes only cancellations fail as if the service were down.
    pub fn set_cancel_unreachable(&self, unreachable: bool) {
        self.state().cancel_unreachable = unreachable;
    }

    /// Returns every call received, oldest first.
    pub fn calls(&self) -> Vec<PaymentCall> {
        self.state().calls.clone()
    }

    /// Returns the number of charge calls received.
    pub fn charge_count(&self) -> usize {
        self.count(|call| matches!(call, PaymentCall::Charge { .. }))
    }

    /// Returns the number of cancel calls received.
    pub fn cancel_count(&self) -> usize {
        self.count(|call| matches!(call, PaymentCall::Cancel { .. }))
    }

    /// Returns the number of calls received for one order.
    pub fn calls_for(&self, order_id: OrderId) -> usize {
        self.count(|call| match call {
            PaymentCall::Charge { order_id: id, .. } | PaymentCall::Cancel { order_id: id } => {
                *id == order_id
            }
        })
    }

    fn count(&self, predicate: impl Fn(&PaymentCall) -> bool) -> usize {
        self.state().calls.iter().filter(|call| predicate(*call)).count()
    }

    /// Records `call` unless the service is down, returning the configured latency.
    fn receive(&self, call: PaymentCall, down: bool) -> Result<Option<Duration>, ClientError> {
        let mut state = self.state();
        if down {
            return Err(ClientError::Unreachable(
                "payment service unavailable".to_string(),
            ));
        }
        state.calls.push(call);
        Ok(state.latency)
    }
}

#[async_trait]
impl PaymentClient for InMemoryPaymentClient {
    async fn charge(&self, order_id: OrderId, amount: Decimal) -> Result<StepOutcome, ClientError> {
        let down = self.state().unreachable;
        let latency = self.receive(PaymentCall::Charge { order_id, amount }, down)?;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if amount > PAYMENT_LIMIT {
            return Ok(StepOutcome::Declined(format!(
                "Payment Failed: Insufficient funds for Order: {order_id}"
            )));
        }
        Ok(StepOutcome::Accepted)
    }

    async fn cancel(&self, order_id: OrderId) -> Result<StepOutcome, ClientError> {
        let down = {
            let state = self.state();
            state.unreachable || state.cancel_unreachable
        };
        let latency = self.receive(PaymentCall::Cancel { order_id }, down)?;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Ok(StepOutcome::Accepted)
    }
}
