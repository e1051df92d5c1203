//! HTTP API server for order fulfillment.
//!
//! Accepts orders, runs each one through the fulfillment saga, and reports
//! the outcome, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use saga::{
    HttpCaller, HttpInventoryClient, HttpPaymentClient, InventoryClient, PaymentClient, SagaConfig,
    SagaFault, SagaOrchestrator,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use routes::orders::{AppState, Orchestrator};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/orders", post(routes::orders::create))
        .route("/api/orders/{id}", get(routes::orders::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state talking to the configured collaborators
/// over HTTP, together with the receiving end of the saga fault channel.
pub fn create_default_state(
    store: Arc<dyn OrderStore>,
    config: &Config,
) -> (Arc<AppState>, UnboundedReceiver<SagaFault>) {
    let client = reqwest::Client::new();
    let payment: Arc<dyn PaymentClient> =
        Arc::new(HttpPaymentClient::from_caller(HttpCaller::with_client(
            client.clone(),
            config.payment_service_url.clone(),
            config.remote_call_timeout,
        )));
    let inventory: Arc<dyn InventoryClient> =
        Arc::new(HttpInventoryClient::from_caller(HttpCaller::with_client(
            client,
            config.inventory_service_url.clone(),
            config.remote_call_timeout,
        )));
    let (tx, rx) = mpsc::unbounded_channel();

    let orchestrator = SagaOrchestrator::new(store, payment, inventory)
        .with_config(SagaConfig {
            step_timeout: config.remote_call_timeout,
        })
        .with_fault_reporter(tx);

    (Arc::new(AppState::new(orchestrator)), rx)
}
