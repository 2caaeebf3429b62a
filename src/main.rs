use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rendezvous::config::Config;
use rendezvous::relay::RelayState;
use rendezvous::shared::AppState;
use rendezvous::websockets::{websocket_handler, InMemoryConnectionManager};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rendezvous=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        port = config.port,
        origin = %config.allowed_origin,
        "Starting signaling relay"
    );

    // All relay state is constructed once here and injected into every handler
    let app_state = AppState::new(
        Arc::new(RelayState::new()),
        Arc::new(InMemoryConnectionManager::new()),
    );

    let app = Router::new()
        .route("/", get(|| async { "rendezvous signaling relay" }))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(config.cors())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap();
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await.unwrap();
}
