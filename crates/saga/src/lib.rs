//! Saga orchestration for order fulfillment.
//!
//! An order moves through a fixed transition table:
//! 1. Charge payment
//! 2. Reserve inventory
//! 3. Complete the order
//!
//! A declined or unreachable payment fails the order straight away. A
//! declined reservation fails it and cancels the charge.

pub mod clients;
pub mod error;
pub mod fault;
pub mod instance;
pub mod machine;
pub mod orchestrator;

pub use clients::{
    ClientError, HttpCaller, HttpInventoryClient, HttpPaymentClient, InMemoryInventoryClient,
    InMemoryPaymentClient, InventoryCall, InventoryClient, PaymentCall, PaymentClient, StepOutcome,
};
pub use error::SagaError;
pub use fault::{FaultKind, FaultSender, SagaFault};
pub use instance::SagaInstance;
pub use machine::{SagaAction, Transition, transition, transitions};
pub use orchestrator::{SagaConfig, SagaOrchestrator};
