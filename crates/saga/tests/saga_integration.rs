//! Integration tests for the order fulfillment saga.

use std::sync::Arc;
use std::time::Duration;

use domain::{CustomerId, NewOrder, OrderState, ProductId};
use order_store::{InMemoryOrderStore, OrderStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use saga::{
    FaultKind, InMemoryInventoryClient, InMemoryPaymentClient, SagaAction, SagaConfig, SagaFault,
    SagaOrchestrator, transitions,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

type TestOrchestrator =
    SagaOrchestrator<InMemoryOrderStore, InMemoryPaymentClient, InMemoryInventoryClient>;

struct TestHarness {
    orchestrator: Arc<TestOrchestrator>,
    store: InMemoryOrderStore,
    payment: InMemoryPaymentClient,
    inventory: InMemoryInventoryClient,
    faults: UnboundedReceiver<SagaFault>,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(SagaConfig::default())
    }

    fn with_config(config: SagaConfig) -> Self {
        let store = InMemoryOrderStore::new();
        let payment = InMemoryPaymentClient::new();
        let inventory = InMemoryInventoryClient::new();
        let (tx, faults) = mpsc::unbounded_channel();

        let orchestrator = SagaOrchestrator::new(store.clone(), payment.clone(), inventory.clone())
            .with_config(config)
            .with_fault_reporter(tx);

        Self {
            orchestrator: Arc::new(orchestrator),
            store,
            payment,
            inventory,
            faults,
        }
    }

    fn drain_faults(&mut self) -> Vec<SagaFault> {
        let mut faults = Vec::new();
        while let Ok(fault) = self.faults.try_recv() {
            faults.push(fault);
        }
        faults
    }
}

fn order(quantity: u32, amount: Decimal) -> NewOrder {
    NewOrder::new(CustomerId::new(42), ProductId::new(7), quantity, amount).unwrap()
}

/// Checks that consecutive statuses are linked by a row of the table.
fn is_table_path(history: &[OrderState]) -> bool {
    history.first() == Some(&OrderState::OrderCreated)
        && history.windows(2).all(|pair| {
            transitions()
                .iter()
                .any(|t| t.source == pair[0] && t.target == pair[1])
        })
}

#[tokio::test]
async fn test_happy_path_full_order_fulfillment() {
    let mut h = TestHarness::new();

    let result = h.orchestrator.run_saga(order(5, dec!(250.00))).await.unwrap();

    assert_eq!(result.status, OrderState::OrderCompleted);
    assert_eq!(result.quantity, 5);
    assert_eq!(result.amount, dec!(250.00));
    assert_eq!(h.payment.charge_count(), 1);
    assert_eq!(h.payment.cancel_count(), 0);
    assert_eq!(h.inventory.reserve_count(), 1);
    assert_eq!(h.inventory.release_count(), 0);
    assert_eq!(
        h.store.status_history(result.id).await,
        vec![
            OrderState::OrderCreated,
            OrderState::PaymentPending,
            OrderState::PaymentCompleted,
            OrderState::InventoryReserved,
            OrderState::OrderCompleted,
        ]
    );
    assert!(h.drain_faults().is_empty());
}

#[tokio::test]
async fn test_limits_are_inclusive() {
    let mut h = TestHarness::new();

    let result = h.orchestrator.run_saga(order(100, dec!(1000))).await.unwrap();

    assert_eq!(result.status, OrderState::OrderCompleted);
    assert!(h.drain_faults().is_empty());
}

#[tokio::test]
async fn test_payment_declined_skips_inventory() {
    let mut h = TestHarness::new();

    let result = h.orchestrator.run_saga(order(5, dec!(1000.01))).await.unwrap();

    assert_eq!(result.status, OrderState::OrderFailed);
    assert_eq!(h.payment.charge_count(), 1);
    assert_eq!(h.payment.cancel_count(), 0);
    assert!(h.inventory.calls().is_empty());
    assert!(h.drain_faults().is_empty());
}

#[tokio::test]
async fn test_inventory_declined_cancels_payment_once() {
    let mut h = TestHarness::new();

    let result = h.orchestrator.run_saga(order(101, dec!(50))).await.unwrap();

    assert_eq!(result.status, OrderState::OrderFailed);
    assert_eq!(h.payment.charge_count(), 1);
    assert_eq!(h.inventory.reserve_count(), 1);
    assert_eq!(h.payment.cancel_count(), 1);
    assert_eq!(h.payment.calls_for(result.id), 2);
    assert_eq!(
        h.store.status_history(result.id).await,
        vec![
            OrderState::OrderCreated,
            OrderState::PaymentPending,
            OrderState::PaymentCompleted,
            OrderState::OrderFailed,
        ]
    );
    assert!(h.drain_faults().is_empty());
}

#[tokio::test]
async fn test_unreachable_inventory_compensates_like_decline() {
    let mut h = TestHarness::new();
    h.inventory.set_unreachable(true);

    let result = h.orchestrator.run_saga(order(1, dec!(10))).await.unwrap();

    assert_eq!(result.status, OrderState::OrderFailed);
    assert_eq!(h.payment.charge_count(), 1);
    assert_eq!(h.payment.cancel_count(), 1);

    let faults = h.drain_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].action, SagaAction::ReserveInventory);
    assert_eq!(faults[0].kind, FaultKind::Unreachable);
    assert!(!faults[0].is_compensation());
}

#[tokio::test]
async fn test_slow_inventory_times_out() {
    let mut h = TestHarness::with_config(SagaConfig {
        step_timeout: Duration::from_millis(25),
    });
    h.inventory.set_latency(Duration::from_secs(2));

    let result = h.orchestrator.run_saga(order(1, dec!(10))).await.unwrap();

    assert_eq!(result.status, OrderState::OrderFailed);
    assert_eq!(h.payment.cancel_count(), 1);

    let faults = h.drain_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].kind, FaultKind::TimedOut);
}

#[tokio::test]
async fn test_compensation_failure_is_reported_not_retried() {
    let mut h = TestHarness::new();
    h.payment.set_cancel_unreachable(true);

    let result = h.orchestrator.run_saga(order(250, dec!(10))).await.unwrap();

    assert_eq!(result.status, OrderState::OrderFailed);
    assert_eq!(h.payment.charge_count(), 1);

    let faults = h.drain_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].action, SagaAction::CompensatePayment);
    assert!(faults[0].is_compensation());
    assert!(faults[0].to_string().contains("compensate_payment"));
}

#[tokio::test]
async fn test_orders_are_independent() {
    let h = TestHarness::new();

    let ok = h.orchestrator.run_saga(order(1, dec!(10))).await.unwrap();
    let declined = h.orchestrator.run_saga(order(1, dec!(5000))).await.unwrap();

    assert_ne!(ok.id, declined.id);
    assert_eq!(ok.status, OrderState::OrderCompleted);
    assert_eq!(declined.status, OrderState::OrderFailed);
    assert_eq!(h.store.order_count().await, 2);
    assert_eq!(h.inventory.reserve_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sagas_follow_the_table() {
    let h = TestHarness::new();
    let mut handles = Vec::new();

    for i in 0..40u32 {
        let orchestrator = Arc::clone(&h.orchestrator);
        // Mix of completed, payment-declined, and inventory-declined orders.
        let (quantity, amount) = match i % 3 {
            0 => (1, dec!(10)),
            1 => (1, dec!(2000)),
            _ => (500, dec!(10)),
        };
        handles.push(tokio::spawn(async move {
            orchestrator.run_saga(order(quantity, amount)).await
        }));
    }

    let mut completed = 0;
    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert!(result.status.is_terminal());
        assert!(is_table_path(&h.store.status_history(result.id).await));

        let stored = h.store.get(result.id).await.unwrap().unwrap();
        assert_eq!(stored.status, result.status);
        if result.status == OrderState::OrderCompleted {
            completed += 1;
        }
    }

    assert_eq!(completed, 14);
    assert_eq!(h.store.order_count().await, 40);
    assert_eq!(h.payment.charge_count(), 40);
    assert_eq!(h.payment.cancel_count(), 13);
    assert_eq!(h.inventory.reserve_count(), 27);
}
