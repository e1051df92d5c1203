//! Saga orchestrator driving orders through the transition table.

use std::future::Future;
use std::time::{Duration, Instant};

use common::OrderId;
use domain::{NewOrder, Order, OrderEvent, OrderState};
use order_store::{OrderStore, OrderStoreExt};

use crate::clients::{ClientError, InventoryClient, PaymentClient, StepOutcome};
use crate::error::SagaError;
use crate::fault::{FaultKind, FaultSender, SagaFault};
use crate::instance::SagaInstance;
use crate::machine::SagaAction;

/// Tunables for saga execution.
#[derive(Debug, Clone)]
pub struct SagaConfig {
    /// Upper bound on every remote call. Expiry counts as a transport fault.
    pub step_timeout: Duration,
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(5),
        }
    }
}

/// Orchestrates the order fulfillment saga.
///
/// Each call to [`run_saga`](Self::run_saga) owns one [`SagaInstance`] for
/// its whole forward path, so events for one order are handled strictly in
/// sequence. Separate orders share nothing but the order store and may run
/// concurrently.
pub struct SagaOrchestrator<S, P, I>
where
    S: OrderStore,
    P: PaymentClient,
    I: InventoryClient,
{
    store: S,
    payment: P,
    inventory: I,
    config: SagaConfig,
    faults: Option<FaultSender>,
}

impl<S, P, I> SagaOrchestrator<S, P, I>
where
    S: OrderStore,
    P: PaymentClient,
    I: InventoryClient,
{
    /// Creates a new saga orchestrator.
    pub fn new(store: S, payment: P, inventory: I) -> Self {
        Self {
            store,
            payment,
            inventory,
            config: SagaConfig::default(),
            faults: None,
        }
    }

    /// Replaces the execution settings.
    pub fn with_config(mut self, config: SagaConfig) -> Self {
        self.config = config;
        self
    }

    /// Sends every transport or compensation fault to `sender`.
    pub fn with_fault_reporter(mut self, sender: FaultSender) -> Self {
        self.faults = Some(sender);
        self
    }

    /// Returns the order store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the saga for a new order and returns it in its terminal state.
    ///
    /// Declined and unreachable collaborators end in `ORDER_FAILED` and are
    /// not errors. Illegal transitions and store failures are.
    #[tracing::instrument(skip(self, new_order), fields(saga_type = "OrderFulfillment"))]
    pub async fn run_saga(&self, new_order: NewOrder) -> Result<Order, SagaError> {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = Instant::now();

        let (order, mut saga) = self.begin(&new_order).await?;
        let result = self.deliver(&mut saga, OrderEvent::CreateOrder).await;

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);

        match result? {
            OrderState::OrderCompleted => {
                metrics::counter!("saga_completed").increment(1);
                tracing::info!(order_id = %order.id, duration, "saga completed successfully");
            }
            OrderState::OrderFailed => {
                metrics::counter!("saga_failed").increment(1);
                tracing::warn!(order_id = %order.id, duration, "saga failed");
            }
            state => {
                tracing::warn!(
                    order_id = %order.id,
                    %state,
                    "saga stopped before a terminal state"
                );
            }
        }

        Ok(self.store.get_existing(order.id).await?)
    }

    /// Persists a new order in `ORDER_CREATED` and opens its saga.
    #[tracing::instrument(skip(self, new_order))]
    pub async fn begin(&self, new_order: &NewOrder) -> Result<(Order, SagaInstance), SagaError> {
        let order = self
            .store
            .create(Order::from_new(OrderId::new(), new_order))
            .await?;
        let saga = SagaInstance::new(order.id);
        tracing::info!(order_id = %order.id, "saga started");
        Ok((order, saga))
    }

    /// Delivers `event` and keeps feeding the events produced by entry
    /// actions back into the same saga until none is left.
    ///
    /// Each new status is persisted before its entry action runs. An illegal
    /// transition stops the loop with the last persisted status intact.
    #[tracing::instrument(skip(self, saga), fields(order_id = %saga.order_id()))]
    pub async fn deliver(
        &self,
        saga: &mut SagaInstance,
        event: OrderEvent,
    ) -> Result<OrderState, SagaError> {
        let order_id = saga.order_id();
        let mut pending = Some(event);

        while let Some(event) = pending.take() {
            let transition = saga.fire(event).inspect_err(|err| {
                tracing::error!(
                    %order_id,
                    state = %saga.state(),
                    %event,
                    error = %err,
                    "event rejected"
                );
            })?;

            self.store.update_status(order_id, transition.target).await?;
            saga.advance(transition);
            tracing::debug!(
                %order_id,
                from = %transition.source,
                to = %transition.target,
                %event,
                "transition applied"
            );

            pending = match transition.action {
                Some(action) => self.perform(order_id, action).await?,
                None => transition.follow_up,
            };
        }

        Ok(saga.state())
    }

    /// Executes an entry action, returning the event it answers with.
    ///
    /// Compensations never answer with an event.
    async fn perform(
        &self,
        order_id: OrderId,
        action: SagaAction,
    ) -> Result<Option<OrderEvent>, SagaError> {
        tracing::info!(%order_id, %action, "saga action started");

        let next = match action {
            SagaAction::ChargePayment => {
                let order = self.store.get_existing(order_id).await?;
                let result = self
                    .bounded(self.payment.charge(order_id, order.amount))
                    .await;
                Some(self.settle(
                    order_id,
                    action,
                    result,
                    OrderEvent::PaymentSuccess,
                    OrderEvent::PaymentFailure,
                ))
            }
            SagaAction::ReserveInventory => {
                let order = self.store.get_existing(order_id).await?;
                let result = self
                    .bounded(self.inventory.reserve(order_id, order.quantity))
                    .await;
                Some(self.settle(
                    order_id,
                    action,
                    result,
                    OrderEvent::InventorySuccess,
                    OrderEvent::InventoryFailure,
                ))
            }
            SagaAction::CompensatePayment => {
                let result = self.bounded(self.payment.cancel(order_id)).await;
                self.settle_compensation(order_id, action, result);
                None
            }
            SagaAction::CompensateInventory => {
                let result = self.bounded(self.inventory.release(order_id)).await;
                self.settle_compensation(order_id, action, result);
                None
            }
        };

        Ok(next)
    }

    /// Bounds a remote call by the configured step timeout.
    async fn bounded<F>(&self, call: F) -> Result<StepOutcome, ClientError>
    where
        F: Future<Output = Result<StepOutcome, ClientError>>,
    {
        let limit = self.config.step_timeout;
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(ClientError::Timeout(limit)))
    }

    /// Turns the result of a forward step into the next event.
    fn settle(
        &self,
        order_id: OrderId,
        action: SagaAction,
        result: Result<StepOutcome, ClientError>,
        success: OrderEvent,
        failure: OrderEvent,
    ) -> OrderEvent {
        match result {
            Ok(StepOutcome::Accepted) => {
                tracing::info!(%order_id, %action, "saga step accepted");
                success
            }
            Ok(StepOutcome::Declined(reason)) => {
                metrics::counter!("saga_steps_declined_total", "action" => action.as_str())
                    .increment(1);
                tracing::info!(%order_id, %action, %reason, "saga step declined");
                failure
            }
            Err(err) => {
                let kind = FaultKind::from(&err);
                self.report(SagaFault::new(order_id, action, kind, err.to_string()));
                failure
            }
        }
    }

    /// Records the result of a best-effort compensation. Never retried.
    fn settle_compensation(
        &self,
        order_id: OrderId,
        action: SagaAction,
        result: Result<StepOutcome, ClientError>,
    ) {
        metrics::counter!("saga_compensations_total", "action" => action.as_str()).increment(1);

        match result {
            Ok(StepOutcome::Accepted) => {
                tracing::info!(%order_id, %action, "compensation completed");
            }
            Ok(StepOutcome::Declined(reason)) => {
                let kind = FaultKind::CompensationDeclined;
                self.report(SagaFault::new(order_id, action, kind, reason));
            }
            Err(err) => {
                let kind = FaultKind::from(&err);
                self.report(SagaFault::new(order_id, action, kind, err.to_string()));
            }
        }
    }

    fn report(&self, fault: SagaFault) {
        metrics::counter!(
            "saga_step_faults_total",
            "action" => fault.action.as_str(),
            "kind" => fault.kind.as_str()
        )
        .increment(1);

        if fault.is_compensation() {
            tracing::warn!(
                order_id = %fault.order_id,
                action = %fault.action,
                kind = fault.kind.as_str(),
                detail = %fault.detail,
                "compensation failed"
            );
        } else {
            tracing::error!(
                order_id = %fault.order_id,
                action = %fault.action,
                kind = fault.kind.as_str(),
                detail = %fault.detail,
                "collaborator call failed"
            );
        }

        if let Some(sender) = &self.faults
            && sender.send(fault).is_err()
        {
            tracing::debug!("fault receiver dropped");
        }
    }
}
