//! Gateway server setup
//!
//! Provides the relay's HTTP router and server lifecycle.

mod handler;
mod state;

pub use handler::socket_handler;
pub use state::GatewayState;

use axum::{routing::get, Router};
use relay_common::{AppConfig, AppError, AppResult};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Path of the WebSocket endpoint
pub const SOCKET_PATH: &str = "/socket";

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route(SOCKET_PATH, get(socket_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create `GatewayState` from configuration
pub fn create_gateway_state(config: AppConfig) -> GatewayState {
    tracing::debug!(
        outbound_buffer = config.relay.outbound_buffer,
        "Creating gateway state"
    );

    GatewayState::new(config)
}

/// Run the gateway server on an already bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> AppResult<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Relay listening on ws://{}{}", addr, SOCKET_PATH);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr = config.relay.address();

    tracing::info!("Starting relay server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::bind(&addr, e))?;

    // Create gateway state
    let state = create_gateway_state(config);

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, listener).await
}
