//! Inventory service client trait and implementations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;

use super::{ClientError, HttpCaller, StepOutcome};

/// Quantity above which the inventory service declines a reservation.
pub const INVENTORY_LIMIT: u32 = 100;

/// Trait for inventory operations used by the saga.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Reserves `quantity` units for an order.
    async fn reserve(&self, order_id: OrderId, quantity: u32) -> Result<StepOutcome, ClientError>;

    /// Releases the reservation held for an order.
    async fn release(&self, order_id: OrderId) -> Result<StepOutcome, ClientError>;
}

#[async_trait]
impl<T: InventoryClient + ?Sized> InventoryClient for Arc<T> {
    async fn reserve(&self, order_id: OrderId, quantity: u32) -> Result<StepOutcome, ClientError> {
        (**self).reserve(order_id, quantity).await
    }

    async fn release(&self, order_id: OrderId) -> Result<StepOutcome, ClientError> {
        (**self).release(order_id).await
    }
}

/// Inventory client talking to the inventory service over HTTP.
///
/// `POST {base}/inventory/reserve?orderId=..&quantity=..` and
/// `POST {base}/inventory/release?orderId=..`.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    http: HttpCaller,
}

impl HttpInventoryClient {
    /// Creates a client for the inventory service at `base_url`.
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
impl InventoryClient for HttpInventoryClient {
    #[tracing::instrument(skip(self), fields(service = "inventory"))]
    async fn reserve(&self, order_id: OrderId, quantity: u32) -> Result<StepOutcome, ClientError> {
        self.http
            .post(
                "/inventory/reserve",
                &[
                    ("orderId", order_id.to_string()),
                    ("quantity", quantity.to_string()),
                ],
            )
            .await
    }

    #[tracing::instrument(skip(self), fields(service = "inventory"))]
    async fn release(&self, order_id: OrderId) -> Result<StepOutcome, ClientError> {
        self.http
            .post("/inventory/release", &[("orderId", order_id.to_string())])
            .await
    }
}

/// A call received by [`InMemoryInventoryClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryCall {
    Reserve { order_id: OrderId, quantity: u32 },
    Release { order_id: OrderId },
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    calls: Vec<InventoryCall>,
    latency: Option<Duration>,
    unreachable: bool,
}

/// In-memory inventory client applying the inventory service's rules.
///
/// Declines reservations above [`INVENTORY_LIMIT`], always accepts releases,
/// and records every call it receives.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryClient {
    state: Arc<Mutex<InMemoryInventoryState>>,
}

impl InMemoryInventoryClient {
    /// Creates a new in-memory inventory client.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryInventoryState> {
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

    /// Returns every call received, oldest first.
    pub fn calls(&self) -> Vec<InventoryCall> {
        self.state().calls.clone()
    }

    /// Returns the number of reserve calls received.
    pub fn reserve_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, InventoryCall::Reserve { .. }))
            .count()
    }

    /// Returns the number of release calls received.
    pub fn release_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, InventoryCall::Release { .. }))
            .count()
    }

    async fn receive(&self, call: InventoryCall) -> Result<(), ClientError> {
        let latency = {
            let mut state = self.state();
            if state.unreachable {
                return Err(ClientError::Unreachable(
                    "inventory service unavailable".to_string(),
                ));
            }
            state.calls.push(call);
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventoryClient {
    async fn reserve(&self, order_id: OrderId, quantity: u32) -> Result<StepOutcome, ClientError> {
        self.receive(InventoryCall::Reserve { order_id, quantity })
            .await?;

        if quantity > INVENTORY_LIMIT {
            return Ok(StepOutcome::Declined(
                "Inventory reservation failed: Out of Stock".to_string(),
            ));
        }
        Ok(StepOutcome::Accepted)
    }

    async fn release(&self, order_id: OrderId) -> Result<StepOutcome, ClientError> {
        self.receive(InventoryCall::Release { order_id }).await?;
        Ok(StepOutcome::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reserve_within_limit_is_accepted() {
        let client = InMemoryInventoryClient::new();
        let order_id = OrderId::new();

        let outcome = client.reserve(order_id, 100).await.unwrap();

        assert!(outcome.is_accepted());
        assert_eq!(
            client.calls(),
            vec![InventoryCall::Reserve {
                order_id,
                quantity: 100
            }]
        );
    }

    #[tokio::test]
    async fn test_reserve_over_limit_is_declined() {
        let client = InMemoryInventoryClient::new();
        let outcome = client.reserve(OrderId::new(), 101).await.unwrap();
        assert!(matches!(outcome, StepOutcome::Declined(_)));
        assert_eq!(client.reserve_count(), 1);
    }

    #[tokio::test]
    async fn test_release_always_accepted() {
        let client = InMemoryInventoryClient::new();
        assert!(client.release(OrderId::new()).await.unwrap().is_accepted());
        assert_eq!(client.release_count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let client = InMemoryInventoryClient::new();
        client.set_unreachable(true);

        let result = client.reserve(OrderId::new(), 1).await;

        assert!(matches!(result, Err(ClientError::Unreachable(_))));
        assert_eq!(client.reserve_count(), 0);
    }
}
