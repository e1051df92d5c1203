//! Inventory service endpoints.

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use common::OrderId;
use serde::Deserialize;

/// Largest quantity the service will reserve for one order.
pub const INVENTORY_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveParams {
    pub order_id: Option<OrderId>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseParams {
    pub order_id: Option<OrderId>,
}

/// Builds the inventory service router.
pub fn inventory_router() -> Router {
    Router::new()
        .route("/health", get(|| async { crate::health("inventory-service") }))
        .route("/inventory/reserve", post(reserve))
        .route("/inventory/release", post(release))
}

/// POST /inventory/reserve?orderId=..&quantity=..: reserves stock for an order.
pub async fn reserve(Query(params): Query<ReserveParams>) -> (StatusCode, String) {
    let Some(order_id) = params.order_id else {
        return (StatusCode::BAD_REQUEST, "Order ID is required".to_string());
    };
    let Some(quantity) = params.quantity else {
        return (StatusCode::BAD_REQUEST, "Quantity is required".to_string());
    };

    if quantity > INVENTORY_LIMIT {
        tracing::warn!(%order_id, quantity, "inventory reservation failed: out of stock");
        return (
            StatusCode::BAD_REQUEST,
            "Inventory reservation failed: Out of Stock".to_string(),
        );
    }

    tracing::info!(%order_id, quantity, "inventory reserved");
    (StatusCode::OK, "Inventory reserved successfully".to_string())
}

/// POST /inventory/release?orderId=..: releases the reservation for an order.
pub async fn release(Query(params): Query<ReleaseParams>) -> (StatusCode, String) {
    let Some(order_id) = params.order_id else {
        return (StatusCode::BAD_REQUEST, "Order ID is required".to_string());
    };

    tracing::info!(%order_id, "inventory released");
    (StatusCode::OK, "Inventory released successfully".to_string())
}
