//! Payment service entry point.

use collaborators::{Config, payment_router, server};

#[tokio::main]
async fn main() {
    server::init_tracing();

    let config = Config::from_env(8081);
    server::run("payment-service", config, payment_router())
        .await
        .expect("payment service error");
}
