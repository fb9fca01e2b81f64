use actix_web::{middleware::Logger, App, HttpServer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod dto;
mod metrics;
mod services;
mod store;

use api::AppState;
use config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,package_tracking=debug")),
        )
        .init();

    tracing::info!("🚀 Starting package tracking service");

    // === 1. Load configuration ===
    let config = AppConfig::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    // === 2. Open the store ===
    let store = store::connect(&config.store).await?;

    // === 3. Initialize Prometheus metrics ===
    let metrics = metrics::Metrics::new()?;
    tracing::info!(
        "📊 Metrics registry created with {} metrics",
        metrics.registry().gather().len()
    );

    // === 4. Serve HTTP ===
    let state = AppState::new(store, metrics, config.auth.clone());
    let bind = (config.http.host.clone(), config.http.port);
    tracing::info!("🌐 Listening on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .bind(bind)?
    .run()
    .await?;

    tracing::info!("👋 Package tracking service stopped");
    Ok(())
}
