use std::sync::Arc;

use podharbor_api::app::{build_app, AppServices};
use podharbor_api::config::AppConfig;

#[tokio::main]
async fn main() {
    podharbor_observability::init();

    let config = AppConfig::from_env();
    let services = Arc::new(AppServices::in_memory(&config));
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
