//! Inventory service entry point.

use collaborators::{Config, inventory_router, server};

#[tokio::main]
async fn main() {
    server::init_tracing();

    let config = Config::from_env(8082);
    server::run("inventory-service", config, inventory_router())
        .await
        .expect("inventory service error");
}
