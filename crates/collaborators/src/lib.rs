//! Reference payment and inventory services.
//!
//! Each service answers `2xx` when it performs a step and `400` with a
//! plain-text reason when it refuses one. The order saga relies on nothing
//! else.

pub mod config;
pub mod inventory;
pub mod payment;
pub mod server;

use axum::Json;
use serde::Serialize;

pub use config::Config;
pub use inventory::inventory_router;
pub use payment::payment_router;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

fn health(service: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service,
    })
}
