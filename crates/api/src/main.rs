//! API server entry point.

use std::sync::Arc;

use api::Config;
use order_store::{InMemoryOrderStore, OrderStore, PostgresOrderStore};
use saga::SagaFault;
use tokio::signal;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Surfaces failed compensations, which leave a charge or reservation behind.
async fn watch_faults(mut faults: UnboundedReceiver<SagaFault>) {
    while let Some(fault) = faults.recv().await {
        if fault.is_compensation() {
            tracing::error!(%fault, "compensation failed, manual follow-up required");
        }
    }
}

async fn open_store(config: &Config) -> Arc<dyn OrderStore> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresOrderStore::connect(url)
                .await
                .expect("failed to connect to database");
            store
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("using PostgreSQL order store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory order store");
            Arc::new(InMemoryOrderStore::new())
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Open the order store and wire the saga
    let store = open_store(&config).await;
    let (state, faults) = api::create_default_state(store, &config);
    tokio::spawn(watch_faults(faults));
    tracing::info!(
        payment = %config.payment_service_url,
        inventory = %config.inventory_service_url,
        timeout_ms = config.remote_call_timeout.as_millis() as u64,
        "collaborators configured"
    );

    // 4. Build the application
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
