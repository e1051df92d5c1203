//! Payment service endpoints.

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use common::OrderId;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Largest amount the service will charge.
pub const PAYMENT_LIMIT: Decimal = Decimal::ONE_THOUSAND;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeParams {
    pub order_id: Option<OrderId>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelParams {
    pub order_id: Option<OrderId>,
}

/// Builds the payment service router.
pub fn payment_router() -> Router {
    Router::new()
        .route("/health", get(|| async { crate::health("payment-service") }))
        .route("/payment", post(charge))
        .route("/payment/cancel", post(cancel))
}

/// POST /payment?orderId=..&amount=..: charges an order.
///
/// Declines amounts above [`PAYMENT_LIMIT`]. A missing amount is charged as is.
pub async fn charge(Query(params): Query<ChargeParams>) -> (StatusCode, String) {
    let Some(order_id) = params.order_id else {
        return (StatusCode::BAD_REQUEST, "Order ID is required".to_string());
    };

    if let Some(amount) = params.amount
        && amount > PAYMENT_LIMIT
    {
        tracing::warn!(%order_id, %amount, "payment declined: insufficient funds");
        return (
            StatusCode::BAD_REQUEST,
            format!("Payment Failed: Insufficient funds for Order: {order_id}"),
        );
    }

    tracing::info!(%order_id, amount = ?params.amount, "payment processed");
    (
        StatusCode::OK,
        format!("Payment Processed Successfully for Order: {order_id}"),
    )
}

/// POST /payment/cancel?orderId=..: cancels the charge for an order.
pub async fn cancel(Query(params): Query<CancelParams>) -> (StatusCode, String) {
    let Some(order_id) = params.order_id else {
        return (StatusCode::BAD_REQUEST, "Order ID is required".to_string());
    };

    tracing::info!(%order_id, "payment cancelled");
    (
        StatusCode::OK,
        format!("Payment Cancelled Successfully for Order: {order_id}"),
    )
}
