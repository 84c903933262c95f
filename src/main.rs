use std::sync::Arc;

use tower_http::cors::CorsLayer;

use sheet_relay::api;
use sheet_relay::config::Config;
use sheet_relay::dispatch::{Dispatcher, RejectionGate};
use sheet_relay::keep_alive;
use sheet_relay::metrics;
use sheet_relay::rate_limit::RateLimiter;
use sheet_relay::sheets::SheetBackend;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load();
    metrics::register_metrics();

    let backend = match SheetBackend::from_config(&config) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("Failed to set up spreadsheet backend: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(backend = backend.kind(), "spreadsheet backend ready");

    let dispatcher = Dispatcher::new(backend, config.tables.clone())
        .with_prefix(&config.command_prefix)
        .with_gate(RejectionGate::new(config.rejection_rate))
        .with_writes(config.allow_sheet_writes);

    if let Some(url) = config.web_url.clone() {
        keep_alive::spawn_self_ping(url, config.keepalive_interval);
    }

    let app = api::router(Arc::new(dispatcher), RateLimiter::new()).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to port {}: {e}", config.port));

    tracing::info!("Sheet relay listening on port {}", config.port);
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
