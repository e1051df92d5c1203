//! Order creation and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::{CustomerId, NewOrder, Order, OrderError, OrderState, ProductId};
use order_store::OrderStore;
use rust_decimal::Decimal;
use saga::{InventoryClient, PaymentClient, SagaOrchestrator};
use serde::Deserialize;
use tracing::Instrument;

use crate::error::ApiError;

/// Orchestrator wired to type-erased store and clients.
pub type Orchestrator =
    SagaOrchestrator<Arc<dyn OrderStore>, Arc<dyn PaymentClient>, Arc<dyn InventoryClient>>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Returns the order store the orchestrator writes to.
    pub fn store(&self) -> &Arc<dyn OrderStore> {
        self.orchestrator.store()
    }
}

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub amount: Option<Decimal>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, ApiError> {
        let customer_id = self
            .customer_id
            .ok_or(OrderError::MissingField("customerId"))?;
        let product_id = self.product_id.ok_or(OrderError::MissingField("productId"))?;
        let quantity = self.quantity.ok_or(OrderError::MissingField("quantity"))?;
        let amount = self.amount.ok_or(OrderError::MissingField("amount"))?;

        let quantity = u32::try_from(quantity)
            .map_err(|_| ApiError::BadRequest(format!("Invalid quantity: {quantity}")))?;

        Ok(NewOrder::new(
            CustomerId::new(customer_id),
            ProductId::new(product_id),
            quantity,
            amount,
        )?)
    }
}

// -- Handlers --

/// POST /api/orders: creates an order and runs its saga to completion.
///
/// Answers 201 with the completed order, or 500 with the failed one. The saga
/// runs on its own task and finishes even if the client goes away.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(req) = payload?;
    let new_order = req.into_new_order()?;

    let saga_state = Arc::clone(&state);
    let order = tokio::spawn(
        async move { saga_state.orchestrator.run_saga(new_order).await }.in_current_span(),
    )
    .await??;

    let status = match order.status {
        OrderState::OrderCompleted => StatusCode::CREATED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    metrics::counter!("api_orders_total", "status" => order.status.as_str()).increment(1);
    tracing::info!(order_id = %order.id, status = %order.status, "order processed");

    Ok((status, Json(order)))
}

/// GET /api/orders/{id}: loads an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .store()
        .get(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
